//! Event types for the headunit event system
//!
//! Provides the playback state enum and the event enum pushed to every
//! registered callback subscriber. Events are serialized for SSE
//! transmission, so the wire shape is part of the contract between the
//! player service and its clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Playback state of the player session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// No source loaded
    Idle,
    /// Source loaded, asynchronous decode initialization in flight
    Preparing,
    /// Decode initialization finished, playback about to start
    Ready,
    Playing,
    Paused,
    /// Stopped after playing; the source must be re-prepared before playing again
    Stopped,
    /// The last load or playback attempt failed
    Error,
}

impl PlaybackState {
    /// True only while a prepared source is loaded (Ready, Playing or Paused).
    ///
    /// Position and duration queries read back zero outside of these states,
    /// and seeks are ignored.
    pub fn is_prepared(&self) -> bool {
        matches!(
            self,
            PlaybackState::Ready | PlaybackState::Playing | PlaybackState::Paused
        )
    }
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackState::Idle => write!(f, "idle"),
            PlaybackState::Preparing => write!(f, "preparing"),
            PlaybackState::Ready => write!(f, "ready"),
            PlaybackState::Playing => write!(f, "playing"),
            PlaybackState::Paused => write!(f, "paused"),
            PlaybackState::Stopped => write!(f, "stopped"),
            PlaybackState::Error => write!(f, "error"),
        }
    }
}

/// Events pushed to registered callback subscribers
///
/// One event is broadcast per state transition, in transition order.
/// Serialized with an internal `type` tag for SSE payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerEvent {
    /// Source prepared and playback started
    Started {
        /// Total source duration in milliseconds
        duration_ms: u64,
        /// When playback started
        timestamp: DateTime<Utc>,
    },

    /// Playback paused by a control call
    Paused {
        /// When playback paused
        timestamp: DateTime<Utc>,
    },

    /// Playback stopped by a control call
    Stopped {
        /// When playback stopped
        timestamp: DateTime<Utc>,
    },

    /// Source played to its end
    Completed {
        /// When playback completed
        timestamp: DateTime<Utc>,
    },

    /// Load or playback failure; the message includes the underlying reason
    Error {
        /// Descriptive failure text
        message: String,
        /// When the failure was observed
        timestamp: DateTime<Utc>,
    },

    /// Periodic position update
    ///
    /// Reserved: not emitted by the player core. Clients poll the position
    /// endpoint instead. Kept on the wire enum so a push-based feed can be
    /// added without a wire break.
    Progress {
        /// Current playback position in milliseconds
        position_ms: u64,
        /// When the position was sampled
        timestamp: DateTime<Utc>,
    },
}

impl PlayerEvent {
    pub fn started(duration_ms: u64) -> Self {
        PlayerEvent::Started {
            duration_ms,
            timestamp: Utc::now(),
        }
    }

    pub fn paused() -> Self {
        PlayerEvent::Paused {
            timestamp: Utc::now(),
        }
    }

    pub fn stopped() -> Self {
        PlayerEvent::Stopped {
            timestamp: Utc::now(),
        }
    }

    pub fn completed() -> Self {
        PlayerEvent::Completed {
            timestamp: Utc::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        PlayerEvent::Error {
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    /// Event type string used for the SSE `event:` field
    pub fn event_type(&self) -> &'static str {
        match self {
            PlayerEvent::Started { .. } => "Started",
            PlayerEvent::Paused { .. } => "Paused",
            PlayerEvent::Stopped { .. } => "Stopped",
            PlayerEvent::Completed { .. } => "Completed",
            PlayerEvent::Error { .. } => "Error",
            PlayerEvent::Progress { .. } => "Progress",
        }
    }
}
