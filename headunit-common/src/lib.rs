//! # Headunit Common Library
//!
//! Shared code for headunit services:
//! - Playback state and event types (`PlayerEvent` enum)
//! - Common error type
//! - Bootstrap configuration loading

pub mod config;
pub mod error;
pub mod events;

pub use error::{Error, Result};
pub use events::{PlaybackState, PlayerEvent};
