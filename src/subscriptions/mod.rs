//! # Subscription lifetimes bound to a fiber.
//!
//! - [`SubscriptionHandle`] - identity-unique, run-at-most-once teardown
//! - [`Subscriptions`] - the registry a fiber disposes when it stops

mod handle;
mod registry;

pub use handle::SubscriptionHandle;
pub use registry::Subscriptions;
