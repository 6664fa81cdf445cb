//! Webhook registration sources for Hookcast.
//!
//! A [`WebhookRepository`] is the persistence collaborator: it only knows
//! how to fetch the currently active registrations. The
//! [`RegistrationCache`] sits in front of it and serves an immutable
//! snapshot for a fixed TTL, so dispatching an event does not cost a
//! repository round trip.

pub mod cache;
pub mod error;
pub mod memory;
pub mod repository;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use cache::{CacheEntry, CacheStats, RegistrationCache, DEFAULT_CACHE_TTL};
pub use error::RepositoryError;
pub use memory::MemoryWebhookRepository;
pub use repository::WebhookRepository;

#[cfg(feature = "postgres")]
pub use postgres::{PostgresConfig, PostgresWebhookRepository};
