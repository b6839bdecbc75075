use std::sync::{Arc, Weak};

use crate::{
    actions::Execute,
    adapters::ThreadAdapter,
    core::Config,
    error::FiberError,
    events::Bus,
    observers::{Observe, ObserverSet},
    timer::{EnqueueTarget, TimerService},
};

use super::fiber::Fiber;

/// Builder for constructing a Fiber with optional features.
pub struct FiberBuilder {
    adapter: Arc<dyn ThreadAdapter>,
    executor: Arc<dyn Execute>,
    cfg: Config,
    bus: Option<Bus>,
    observers: Vec<Arc<dyn Observe>>,
    service: Option<TimerService>,
}

impl FiberBuilder {
    /// Creates a new builder around the two required collaborators.
    ///
    /// Both are shared, not owned: the caller decides their lifetime.
    pub fn new(adapter: Arc<dyn ThreadAdapter>, executor: Arc<dyn Execute>) -> Self {
        Self {
            adapter,
            executor,
            cfg: Config::default(),
            bus: None,
            observers: Vec::new(),
            service: None,
        }
    }

    /// Replaces the default configuration.
    pub fn with_config(mut self, cfg: Config) -> Self {
        self.cfg = cfg;
        self
    }

    /// Publishes events on an existing bus (e.g. one shared with the executor).
    pub fn with_bus(mut self, bus: Bus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Sets event observers.
    ///
    /// Observers receive fiber events through dedicated workers with bounded
    /// queues running on the timer service runtime.
    pub fn with_observers(mut self, observers: Vec<Arc<dyn Observe>>) -> Self {
        self.observers = observers;
        self
    }

    /// Schedules timers on `service` instead of the process-wide one.
    pub fn with_timer_service(mut self, service: TimerService) -> Self {
        self.service = Some(service);
        self
    }

    /// Builds and returns the Fiber instance in the `Created` state.
    ///
    /// This consumes the builder and initializes:
    /// - Event bus (unless supplied)
    /// - Timer on the chosen timing service
    /// - Subscription registry
    /// - Observer workers and bus listener (if any observers)
    pub fn build(self) -> Result<Arc<Fiber>, FiberError> {
        let service = match self.service {
            Some(service) => service,
            None => TimerService::shared()?,
        };
        let bus = self
            .bus
            .unwrap_or_else(|| Bus::new(self.cfg.bus_capacity_clamped()));

        if !self.observers.is_empty() {
            let set = Arc::new(ObserverSet::new(self.observers, &service));
            set.listen(&bus, &service);
        }

        let name: Arc<str> = Arc::from(self.cfg.name.as_str());
        let adapter = self.adapter;
        let executor = self.executor;

        Ok(Arc::new_cyclic(|weak: &Weak<Fiber>| {
            let target: Weak<dyn EnqueueTarget> = weak.clone();
            Fiber::new_internal(name, adapter, executor, service, target, bus)
        }))
    }
}
