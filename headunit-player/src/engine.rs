//! Media engine
//!
//! The single underlying playback resource owned by a player session.
//! Decode initialization (the slow step) probes the source with symphonia:
//! container detection, default track selection, and duration from the
//! track's time base and frame count. Sample rendering is out of scope;
//! once prepared, the transport tracks playback position against the wall
//! clock and the session's completion timer ends playback at the source's
//! duration.
//!
//! The engine has no locking of its own. Every call happens under the
//! owning session's lock, including the completion paths that originate on
//! engine worker tasks.

use crate::error::{Error, Result};
use crate::source::ProbeTarget;
use std::fs::File;
use std::time::Instant;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

/// Result of a successful probe
#[derive(Debug, Clone, Copy)]
pub struct PreparedSource {
    /// Total source duration in milliseconds (0 when the container does not declare it)
    pub duration_ms: u64,
}

/// Probe a media source, blocking the calling thread.
///
/// This is the decode-initialization step; run it on a blocking worker, not
/// on a control thread.
pub(crate) fn probe(target: ProbeTarget) -> Result<PreparedSource> {
    let description = target.describe();
    let mut hint = Hint::new();

    let file = match target {
        ProbeTarget::Path(ref path) => {
            if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                hint.with_extension(ext);
            }
            File::open(path)
                .map_err(|e| Error::Source(format!("cannot open {}: {}", description, e)))?
        }
        ProbeTarget::Handle(file) => file,
    };

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| Error::Source(format!("cannot decode {}: {}", description, e)))?;

    let format = probed.format;
    let track = format
        .default_track()
        .ok_or_else(|| Error::Source(format!("no audio track in {}", description)))?;

    let params = &track.codec_params;
    let duration_ms = match (params.time_base, params.n_frames) {
        (Some(time_base), Some(frames)) => {
            let time = time_base.calc_time(frames);
            time.seconds * 1000 + (time.frac * 1000.0) as u64
        }
        _ => 0,
    };

    debug!(source = %description, duration_ms, "source probed");
    Ok(PreparedSource { duration_ms })
}

/// Wall-clock playback transport
///
/// `base_ms` is the position at the last pause/seek/start boundary;
/// `resumed_at` is set while running.
#[derive(Debug, Default)]
struct Transport {
    base_ms: u64,
    resumed_at: Option<Instant>,
}

impl Transport {
    fn position_ms(&self) -> u64 {
        match self.resumed_at {
            Some(since) => self.base_ms + since.elapsed().as_millis() as u64,
            None => self.base_ms,
        }
    }
}

/// The playback resource exclusively owned by one session
#[derive(Debug, Default)]
pub struct MediaEngine {
    prepared: Option<PreparedSource>,
    transport: Transport,
}

impl MediaEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop any prepared source and rewind the transport.
    pub fn reset(&mut self) {
        self.prepared = None;
        self.transport = Transport::default();
    }

    /// Install a probed source. The transport starts rewound and idle.
    pub fn set_prepared(&mut self, prepared: PreparedSource) {
        self.prepared = Some(prepared);
        self.transport = Transport::default();
    }

    /// Begin running the transport from its current position.
    pub fn start(&mut self) {
        if self.transport.resumed_at.is_none() {
            self.transport.resumed_at = Some(Instant::now());
        }
    }

    /// Freeze the transport at its current position.
    pub fn pause(&mut self) {
        if let Some(since) = self.transport.resumed_at.take() {
            self.transport.base_ms += since.elapsed().as_millis() as u64;
        }
    }

    /// Stop and unload; the source must be re-prepared before playing again.
    pub fn stop(&mut self) {
        self.reset();
    }

    /// Move the transport, clamped to the source duration. No-op when unprepared.
    pub fn seek_to(&mut self, position_ms: u64) {
        if self.prepared.is_none() {
            return;
        }
        let clamped = position_ms.min(self.duration_ms());
        self.transport.base_ms = clamped;
        if self.transport.resumed_at.is_some() {
            self.transport.resumed_at = Some(Instant::now());
        }
    }

    /// Current position in milliseconds, clamped to the duration; 0 when unprepared.
    pub fn position_ms(&self) -> u64 {
        if self.prepared.is_none() {
            return 0;
        }
        let duration = self.duration_ms();
        let position = self.transport.position_ms();
        if duration > 0 {
            position.min(duration)
        } else {
            position
        }
    }

    /// Total source duration in milliseconds; 0 when unprepared.
    pub fn duration_ms(&self) -> u64 {
        self.prepared.map(|p| p.duration_ms).unwrap_or(0)
    }

    /// Live transport flag.
    pub fn is_playing(&self) -> bool {
        self.prepared.is_some() && self.transport.resumed_at.is_some()
    }
}
