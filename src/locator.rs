use crate::boxes::SOUN;
use crate::parser;
use crate::scanner::{self, Result, ScanError};
use log::warn;
use serde::{Deserialize, Serialize};

/// Anything that can answer "which track is the first audio track?".
///
/// `Ok(None)` is the not-found result; the only error is a buffer too short
/// to hold a box header.
pub trait AudioTrackLocator: Send + Sync {
    fn find_audio_track(&self, data: &[u8]) -> Result<Option<usize>>;

    fn name(&self) -> &'static str;
}

/// Tag-signature search over every byte offset. See [`scanner`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SignatureScanner;

impl AudioTrackLocator for SignatureScanner {
    fn find_audio_track(&self, data: &[u8]) -> Result<Option<usize>> {
        scanner::find_audio_track_index(data)
    }

    fn name(&self) -> &'static str {
        "signature"
    }
}

/// Box-by-box walk of `moov/trak/mdia/hdlr`, skipping forward by declared
/// box sizes. Tags inside payloads are never mistaken for tracks.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuralScanner;

impl AudioTrackLocator for StructuralScanner {
    fn find_audio_track(&self, data: &[u8]) -> Result<Option<usize>> {
        scanner::check_len(data)?;
        let tracks = match parser::tracks(data) {
            Ok(t) => t,
            Err(e) => {
                warn!("structural walk aborted: {e}");
                return Ok(None);
            }
        };
        Ok(tracks
            .iter()
            .position(|t| t.handler.is_some_and(|h| h.handler_type == SOUN)))
    }

    fn name(&self) -> &'static str {
        "strict"
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    #[default]
    Signature,
    Strict,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    pub mode: ScanMode,
}

impl ScanOptions {
    pub fn locator(&self) -> Box<dyn AudioTrackLocator> {
        match self.mode {
            ScanMode::Signature => Box::new(SignatureScanner),
            ScanMode::Strict => Box::new(StructuralScanner),
        }
    }
}

/// Result of a locate call in the shape exposed across the C ABI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "index", rename_all = "snake_case")]
pub enum ScanOutcome {
    Found(usize),
    NotFound,
}

impl ScanOutcome {
    pub const NOT_FOUND: i32 = -1;

    /// `n >= 0` for a found track, `-1` otherwise.
    ///
    /// Each ordinal belongs to a distinct tag offset, so it is smaller than
    /// the buffer length; the C ABI caps that length at `c_int::MAX`.
    pub fn status_code(&self) -> i32 {
        match *self {
            ScanOutcome::Found(n) => {
                debug_assert!(n <= i32::MAX as usize, "track ordinal {n} exceeds i32");
                n as i32
            }
            ScanOutcome::NotFound => Self::NOT_FOUND,
        }
    }
}

impl From<Option<usize>> for ScanOutcome {
    fn from(v: Option<usize>) -> Self {
        v.map_or(ScanOutcome::NotFound, ScanOutcome::Found)
    }
}

/// Collapse a locate result into the integer protocol: index, -1, or -2.
pub fn status_code(res: std::result::Result<Option<usize>, ScanError>) -> i32 {
    match res {
        Ok(v) => ScanOutcome::from(v).status_code(),
        Err(e) => e.status_code(),
    }
}
