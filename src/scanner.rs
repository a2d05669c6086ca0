//! Signature-search audio track locator.
//!
//! Every byte offset of the buffer is tested for the `trak` tag; boxes are
//! never skipped by their declared size, so a tag embedded in another box's
//! payload is reported as a track too. Within each track the same search
//! runs for `hdlr`, and the first handler whose type is `soun` marks the
//! track as audio.

use crate::boxes::{FourCC, HDLR, SOUN, TRAK};
use crate::reader::ByteReader;
use log::{debug, trace};

/// Size of a compact box header: 32-bit size plus 4CC.
pub const HEADER_LEN: usize = 8;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanError {
    #[error("invalid input: {len} bytes is shorter than one box header")]
    InvalidInput { len: usize },
}

impl ScanError {
    /// Integer code used by the C ABI exports.
    pub fn status_code(&self) -> i32 {
        match self {
            ScanError::InvalidInput { .. } => -2,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;

pub(crate) fn check_len(data: &[u8]) -> Result<()> {
    if data.len() < HEADER_LEN {
        return Err(ScanError::InvalidInput { len: data.len() });
    }
    Ok(())
}

/// Return the ordinal of the first `trak` whose handler type is `soun`.
///
/// `Ok(None)` means the scan completed without finding an audio track.
/// Fails only when `data` is shorter than [`HEADER_LEN`].
///
/// ```
/// let mut hdlr = Vec::new();
/// hdlr.extend_from_slice(&32u32.to_be_bytes());
/// hdlr.extend_from_slice(b"hdlr");
/// hdlr.extend_from_slice(&[0u8; 8]);
/// hdlr.extend_from_slice(b"soun");
/// hdlr.extend_from_slice(&[0u8; 12]);
///
/// let mut trak = Vec::new();
/// trak.extend_from_slice(&(8 + hdlr.len() as u32).to_be_bytes());
/// trak.extend_from_slice(b"trak");
/// trak.extend_from_slice(&hdlr);
///
/// assert_eq!(trakfind::find_audio_track_index(&trak), Ok(Some(0)));
/// ```
pub fn find_audio_track_index(data: &[u8]) -> Result<Option<usize>> {
    check_len(data)?;
    let r = ByteReader::new(data);
    let len = r.len();

    let mut ordinal = 0usize;
    for trak_start in tag_offsets(&r, 0, len - HEADER_LEN, TRAK) {
        let Some(size) = r.u32_at(trak_start) else { continue };
        let trak_end = trak_end(trak_start, size, len);
        trace!("trak #{ordinal} at {trak_start:#x} size={size} end={trak_end:#x}");

        if trak_is_audio(&r, trak_start, trak_end) {
            debug!("audio track found: ordinal {ordinal} at offset {trak_start:#x}");
            return Ok(Some(ordinal));
        }
        ordinal += 1;
    }

    debug!("no audio track among {ordinal} trak signatures");
    Ok(None)
}

/// Size 1 announces a 64-bit size that is not read here; the box is taken
/// to run to the end of the buffer instead.
fn trak_end(start: usize, size: u32, len: usize) -> usize {
    if size == 1 {
        return len;
    }
    start.saturating_add(size as usize).min(len)
}

fn trak_is_audio(r: &ByteReader<'_>, trak_start: usize, trak_end: usize) -> bool {
    let first = trak_start + HEADER_LEN;
    let Some(last) = trak_end.checked_sub(HEADER_LEN) else { return false };

    for hdlr in tag_offsets(r, first, last, HDLR) {
        match r.handler_record(hdlr + HEADER_LEN) {
            Some(h) if h.handler_type == SOUN => return true,
            Some(h) => trace!("hdlr at {hdlr:#x}: v{} type={}", h.version, h.handler_type),
            None => trace!("hdlr at {hdlr:#x}: truncated"),
        }
    }
    false
}

/// Offsets `i` in `first..=last` where a box header carrying `tag` could
/// start, i.e. where bytes `i+4..i+8` equal `tag`.
fn tag_offsets<'r>(
    r: &'r ByteReader<'_>,
    first: usize,
    last: usize,
    tag: FourCC,
) -> impl Iterator<Item = usize> + 'r {
    (first..=last).filter(move |&i| r.tag_at(i + 4, tag))
}
