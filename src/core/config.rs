//! # Fiber configuration.
//!
//! Provides [`Config`] centralized settings for a fiber.
//!
//! Config is used in two ways:
//! 1. **Builder wiring**: `Fiber::builder(adapter, executor).with_config(cfg)`
//! 2. **Dedicated fibers**: `Fiber::dedicated(cfg)` also names the OS thread
//!
//! ## Sentinel values
//! - `bus_capacity = 0` → clamped to 1 (a broadcast channel needs room for one event)

/// Configuration for a single fiber.
///
/// ## Field semantics
/// - `name`: label carried by every event the fiber publishes; thread name for
///   dedicated fibers
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped) when the
///   builder creates the bus itself
#[derive(Clone, Debug)]
pub struct Config {
    /// Human-readable fiber name.
    pub name: String,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow receivers that lag behind more than `bus_capacity` events will
    /// skip older items. Ignored when a bus is supplied to the builder.
    pub bus_capacity: usize,
}

impl Config {
    /// Default configuration with a custom name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `name = "fiber"`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            name: "fiber".to_string(),
            bus_capacity: 1024,
        }
    }
}
