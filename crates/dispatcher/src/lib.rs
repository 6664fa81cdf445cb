//! Fan-out of events to matching webhook registrations.
//!
//! [`Dispatcher::dispatch`] takes one [`EventRecord`](hookcast_core::EventRecord),
//! reads the active registrations through a
//! [`RegistrationCache`](hookcast_registry::RegistrationCache), selects the
//! registrations whose subscription predicate matches, and delivers to each
//! of them independently. Only successful deliveries are returned, in
//! registration order; a failed delivery never affects its siblings.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod metrics;

pub use config::DispatcherConfig;
pub use dispatcher::{Dispatcher, select_targets};
pub use error::DispatchError;
pub use metrics::{DispatchMetrics, DispatchMetricsSnapshot};
