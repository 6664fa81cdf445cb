//! HTTP front end for the Hookcast webhook fan-out engine.
//!
//! Producers `POST` events to `/v1/events`; each event is handed to the
//! [`Dispatcher`](hookcast_dispatcher::Dispatcher) built by
//! [`factory::create_dispatcher`] from a [`config::HookcastConfig`].

pub mod api;
pub mod config;
pub mod error;
pub mod factory;
pub mod telemetry;
