//! Player session
//!
//! The long-lived service object behind the control surface. One session
//! owns one media engine and serializes every control call, and every
//! engine-driven completion, through a single mutex. Events are captured
//! and pushed to the callback registry inside the critical section, so the
//! per-subscriber event order always matches the state-transition order;
//! the pushes are non-blocking channel writes, and actual delivery to each
//! peer fans out in the transport's per-subscriber tasks.
//!
//! Loading a source is asynchronous: the control call resets the engine,
//! bumps the generation token and returns; decode initialization runs on a
//! blocking worker, and its completion re-acquires the lock and checks the
//! generation so a completion superseded by a newer load (or by teardown)
//! is discarded instead of corrupting current state.
//!
//! Lock ordering: the session lock may be held while taking the registry's
//! lock, never the reverse.

use crate::engine::{self, MediaEngine, PreparedSource};
use crate::error::{Error, Result};
use crate::registry::{CallbackRegistry, EventSender};
use crate::source::MediaSource;
use headunit_common::events::{PlaybackState, PlayerEvent};
use std::fs::File;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Pad added to completion-timer sleeps so the deadline is past the clock edge
const COMPLETION_SLACK_MS: u64 = 25;

struct SessionInner {
    engine: Option<MediaEngine>,
    state: PlaybackState,
    generation: u64,
    torn_down: bool,
}

impl SessionInner {
    /// The engine is created lazily on first use and released on teardown.
    fn engine_mut(&mut self) -> &mut MediaEngine {
        if self.engine.is_none() {
            debug!("media engine created");
            self.engine = Some(MediaEngine::new());
        }
        self.engine.as_mut().unwrap()
    }
}

/// Outcome of a completion-timer check
enum CompletionCheck {
    /// Source finished; Completed was emitted
    Done,
    /// Timer is stale or playback is no longer running
    Disarm,
    /// Position was moved back; sleep again for this many milliseconds
    Reschedule(u64),
}

/// The remote-controlled playback service object
///
/// Explicitly constructed, explicitly torn down. All methods tolerate
/// concurrent invocation from arbitrary threads.
pub struct PlayerSession {
    inner: Mutex<SessionInner>,
    registry: Arc<CallbackRegistry>,
}

impl PlayerSession {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(SessionInner {
                engine: None,
                state: PlaybackState::Idle,
                generation: 0,
                torn_down: false,
            }),
            registry: Arc::new(CallbackRegistry::new()),
        })
    }

    // ------------------------------------------------------------------
    // Callback management
    // ------------------------------------------------------------------

    /// Register an event subscriber; each call adds one delivery slot.
    pub fn register_callback(&self, tx: EventSender) -> Uuid {
        self.registry.register(tx)
    }

    /// Remove one delivery slot. No-op for unknown tokens.
    pub fn unregister_callback(&self, id: Uuid) {
        self.registry.unregister(id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.len()
    }

    // ------------------------------------------------------------------
    // Control surface
    // ------------------------------------------------------------------

    /// Load a source by path and start playing once prepared.
    ///
    /// Returns immediately; the outcome arrives as a `Started` or `Error`
    /// event. An empty path is silently ignored.
    pub fn play(self: &Arc<Self>, path: impl AsRef<Path>) {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            debug!("play ignored: empty path");
            return;
        }
        info!(path = %path.display(), "play requested");
        self.load(MediaSource::Path(path.to_path_buf()));
    }

    /// Load a source from a caller-opened handle and start playing once
    /// prepared.
    ///
    /// The handle is consumed: the engine works on a duplicate of the
    /// descriptor and the service's reference is closed before this call
    /// returns, on every path.
    pub fn play_handle(self: &Arc<Self>, file: File) {
        info!("play requested from open handle");
        self.load(MediaSource::Handle(file));
    }

    fn load(self: &Arc<Self>, source: MediaSource) {
        let description = source.describe();
        let generation;
        {
            let mut inner = self.inner.lock().unwrap();
            if inner.torn_down {
                debug!("load ignored: session torn down");
                return;
            }
            // a new source always resets the engine to unprepared first;
            // the bumped generation orphans any in-flight prepare
            inner.engine_mut().reset();
            inner.generation += 1;
            generation = inner.generation;
            inner.state = PlaybackState::Preparing;
            debug!(generation, source = %description, "state -> preparing");
        }

        // For handles this duplicates the descriptor for the engine and
        // closes the caller-facing reference, even when duplication fails.
        let target = match source.into_probe_target() {
            Ok(target) => target,
            Err(e) => {
                self.finish_prepare(generation, Err(e));
                return;
            }
        };

        let session = Arc::clone(self);
        tokio::spawn(async move {
            let outcome = match tokio::task::spawn_blocking(move || engine::probe(target)).await {
                Ok(outcome) => outcome,
                Err(e) => Err(Error::Internal(format!("prepare task failed: {}", e))),
            };
            session.finish_prepare(generation, outcome);
        });
    }

    /// Pause playback. No-op unless currently playing.
    pub fn pause(&self) {
        let mut inner = self.inner.lock().unwrap();
        if inner.torn_down || inner.state != PlaybackState::Playing {
            debug!(state = %inner.state, "pause ignored");
            return;
        }
        inner.engine_mut().pause();
        inner.state = PlaybackState::Paused;
        info!("playback paused");
        self.registry.broadcast(&PlayerEvent::paused());
    }

    /// Stop playback and unload the source. No-op unless a source is loaded.
    pub fn stop(&self) {
        let mut inner = self.inner.lock().unwrap();
        if inner.torn_down || !inner.state.is_prepared() {
            debug!(state = %inner.state, "stop ignored");
            return;
        }
        inner.engine_mut().stop();
        inner.state = PlaybackState::Stopped;
        info!("playback stopped");
        self.registry.broadcast(&PlayerEvent::stopped());
    }

    /// Move the playback position. Silently ignored until a source is prepared.
    pub fn seek_to(&self, position_ms: u64) {
        let mut inner = self.inner.lock().unwrap();
        if inner.torn_down || !inner.state.is_prepared() {
            debug!(position_ms, "seek ignored, no prepared source");
            return;
        }
        inner.engine_mut().seek_to(position_ms);
        debug!(position_ms, "seek applied");
    }

    /// Current position in milliseconds; 0 until a source is prepared.
    pub fn position_ms(&self) -> u64 {
        let inner = self.inner.lock().unwrap();
        if !inner.state.is_prepared() {
            return 0;
        }
        inner.engine.as_ref().map(|e| e.position_ms()).unwrap_or(0)
    }

    /// Source duration in milliseconds; 0 until a source is prepared.
    pub fn duration_ms(&self) -> u64 {
        let inner = self.inner.lock().unwrap();
        if !inner.state.is_prepared() {
            return 0;
        }
        inner.engine.as_ref().map(|e| e.duration_ms()).unwrap_or(0)
    }

    /// Live engine playing flag; false whenever the engine cannot be queried.
    pub fn is_playing(&self) -> bool {
        let inner = self.inner.lock().unwrap();
        inner.engine.as_ref().map(|e| e.is_playing()).unwrap_or(false)
    }

    /// Current state of the session's state machine.
    pub fn state(&self) -> PlaybackState {
        self.inner.lock().unwrap().state
    }

    /// Release the engine and drop every subscriber. Further control calls
    /// are no-ops.
    pub fn teardown(&self) {
        {
            let mut inner = self.inner.lock().unwrap();
            if inner.torn_down {
                return;
            }
            inner.torn_down = true;
            // orphan any in-flight prepare or completion timer
            inner.generation += 1;
            inner.state = PlaybackState::Idle;
            if inner.engine.take().is_some() {
                debug!("media engine released");
            }
        }
        self.registry.close();
        info!("player session torn down");
    }

    // ------------------------------------------------------------------
    // Engine-driven transitions
    // ------------------------------------------------------------------

    fn finish_prepare(self: &Arc<Self>, generation: u64, outcome: Result<PreparedSource>) {
        let mut armed: Option<u64> = None;
        {
            let mut inner = self.inner.lock().unwrap();
            if inner.torn_down || inner.generation != generation {
                debug!(generation, "discarding superseded prepare completion");
                return;
            }
            match outcome {
                Ok(prepared) => {
                    let duration_ms = prepared.duration_ms;
                    inner.engine_mut().set_prepared(prepared);
                    inner.state = PlaybackState::Ready;
                    // the engine auto-starts playback as soon as it is ready
                    inner.engine_mut().start();
                    inner.state = PlaybackState::Playing;
                    info!(duration_ms, "source prepared, playback started");
                    self.registry.broadcast(&PlayerEvent::started(duration_ms));
                    if duration_ms > 0 {
                        armed = Some(duration_ms);
                    }
                }
                Err(e) => {
                    let message = e.to_string();
                    if let Some(engine) = inner.engine.as_mut() {
                        engine.reset();
                    }
                    inner.state = PlaybackState::Error;
                    warn!(error = %message, "prepare failed");
                    self.registry.broadcast(&PlayerEvent::error(message));
                }
            }
        }
        if let Some(duration_ms) = armed {
            self.arm_completion_timer(generation, duration_ms);
        }
    }

    /// Sleep until the expected end of the source, then revalidate. A timer
    /// that outlived its load, or fires while playback is paused or
    /// stopped, stands down; one that fires early after a backwards seek
    /// sleeps again for the remainder.
    fn arm_completion_timer(self: &Arc<Self>, generation: u64, delay_ms: u64) {
        let session = Arc::clone(self);
        tokio::spawn(async move {
            let mut delay_ms = delay_ms;
            loop {
                tokio::time::sleep(Duration::from_millis(delay_ms + COMPLETION_SLACK_MS)).await;
                match session.check_completion(generation) {
                    CompletionCheck::Done | CompletionCheck::Disarm => break,
                    CompletionCheck::Reschedule(remaining_ms) => delay_ms = remaining_ms,
                }
            }
        });
    }

    fn check_completion(&self, generation: u64) -> CompletionCheck {
        let mut inner = self.inner.lock().unwrap();
        if inner.torn_down
            || inner.generation != generation
            || inner.state != PlaybackState::Playing
        {
            return CompletionCheck::Disarm;
        }
        let engine = match inner.engine.as_mut() {
            Some(engine) => engine,
            None => return CompletionCheck::Disarm,
        };
        let position_ms = engine.position_ms();
        let duration_ms = engine.duration_ms();
        if duration_ms == 0 {
            return CompletionCheck::Disarm;
        }
        if position_ms < duration_ms {
            return CompletionCheck::Reschedule(duration_ms - position_ms);
        }
        engine.stop();
        inner.state = PlaybackState::Stopped;
        info!(duration_ms, "playback completed");
        self.registry.broadcast(&PlayerEvent::completed());
        CompletionCheck::Done
    }
}
