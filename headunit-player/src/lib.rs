//! # Headunit Player Library
//!
//! Remote-controlled playback service: a long-lived player session driven
//! over an HTTP control surface, broadcasting state-change events to a
//! dynamic set of SSE subscribers.
//!
//! **Architecture:** one [`session::PlayerSession`] serializes all control
//! calls through a single lock and owns the media engine; the
//! [`registry::CallbackRegistry`] fans events out to subscribers and prunes
//! the ones whose peers have gone away; `api` mounts both on axum.

pub mod api;
pub mod devices;
pub mod engine;
pub mod error;
pub mod registry;
pub mod session;
pub mod source;

pub use error::{Error, Result};
pub use session::PlayerSession;
