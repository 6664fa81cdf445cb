//! Core types shared by every Hookcast crate.
//!
//! The data model is deliberately small: an [`EventRecord`] describes one
//! inbound event, a [`WebhookRegistration`] describes one external endpoint
//! and the events it subscribes to, and a [`DeliveryOutcome`] records one
//! successful delivery.

pub mod error;
pub mod event;
pub mod outcome;
pub mod webhook;

pub use error::CoreError;
pub use event::{EventCategory, EventRecord};
pub use outcome::DeliveryOutcome;
pub use webhook::{Subscription, WebhookRegistration};
