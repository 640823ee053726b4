//! Media source hand-off
//!
//! Control callers supply either a path (the service opens it) or an
//! already-open file handle (the caller grants a readable descriptor and is
//! done with it once the call returns). For handles, the engine works on a
//! duplicate of the descriptor; the handle given to the service is consumed
//! by value, so it is closed exactly once whether the probe succeeds, the
//! probe rejects the source, or duplication itself fails.

use crate::error::{Error, Result};
use std::fs::File;
use std::path::PathBuf;

/// Media input accepted by the control surface
#[derive(Debug)]
pub enum MediaSource {
    /// Filesystem path, opened by the service
    Path(PathBuf),
    /// Caller-opened handle, moved into the service
    Handle(File),
}

impl MediaSource {
    /// Human-readable description for logs and error messages
    pub fn describe(&self) -> String {
        match self {
            MediaSource::Path(path) => path.display().to_string(),
            MediaSource::Handle(_) => "<open handle>".to_string(),
        }
    }

    /// Convert into the engine's own probe input.
    ///
    /// For `Handle`, duplicates the descriptor for the engine and drops the
    /// original, which closes the service's reference. The duplicate shares
    /// the underlying file description, so the engine reads from the
    /// caller's current offset.
    pub(crate) fn into_probe_target(self) -> Result<ProbeTarget> {
        match self {
            MediaSource::Path(path) => Ok(ProbeTarget::Path(path)),
            MediaSource::Handle(file) => {
                let duplicate = file
                    .try_clone()
                    .map_err(|e| Error::Engine(format!("cannot duplicate media handle: {}", e)))?;
                // `file` drops here; the service keeps no reference
                Ok(ProbeTarget::Handle(duplicate))
            }
        }
    }
}

/// Engine-side probe input, produced by [`MediaSource::into_probe_target`]
#[derive(Debug)]
pub(crate) enum ProbeTarget {
    Path(PathBuf),
    Handle(File),
}

impl ProbeTarget {
    pub(crate) fn describe(&self) -> String {
        match self {
            ProbeTarget::Path(path) => path.display().to_string(),
            ProbeTarget::Handle(_) => "<open handle>".to_string(),
        }
    }
}
