//! Container-demuxing contract: open a buffer, count its streams, and report
//! each stream's media type. Any implementation can drive a locator through
//! [`DemuxLocator`].

use crate::boxes::MediaType;
use crate::locator::AudioTrackLocator;
use crate::parser::{self, ParseError, TrackEntry};
use crate::scanner::{self, ScanError};
use log::debug;

#[derive(thiserror::Error, Debug)]
pub enum DemuxError {
    #[error(transparent)]
    InvalidInput(#[from] ScanError),
    #[error("parse: {0}")]
    Parse(#[from] ParseError),
}

pub trait Demuxer: Send + Sync {
    type Handle;

    fn open_from_buffer(&self, data: &[u8]) -> Result<Self::Handle, DemuxError>;

    fn stream_count(&self, handle: &Self::Handle) -> usize;

    /// Media type of stream `index`; out-of-range indices are `Other`.
    fn stream_media_type(&self, handle: &Self::Handle, index: usize) -> MediaType;
}

/// Demuxer over the structural box walk: one stream per `moov/trak`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BoxTreeDemuxer;

#[derive(Debug, Clone)]
pub struct BoxTree {
    pub tracks: Vec<TrackEntry>,
}

impl Demuxer for BoxTreeDemuxer {
    type Handle = BoxTree;

    fn open_from_buffer(&self, data: &[u8]) -> Result<BoxTree, DemuxError> {
        scanner::check_len(data)?;
        Ok(BoxTree { tracks: parser::tracks(data)? })
    }

    fn stream_count(&self, handle: &BoxTree) -> usize {
        handle.tracks.len()
    }

    fn stream_media_type(&self, handle: &BoxTree, index: usize) -> MediaType {
        handle
            .tracks
            .get(index)
            .and_then(|t| t.handler)
            .map_or(MediaType::Other, |h| MediaType::from(h.handler_type))
    }
}

/// Locates the first audio stream by asking a [`Demuxer`].
///
/// A buffer the demuxer refuses to open is reported as invalid input.
#[derive(Debug, Default, Clone)]
pub struct DemuxLocator<D> {
    demuxer: D,
}

impl<D: Demuxer> DemuxLocator<D> {
    pub fn new(demuxer: D) -> Self {
        Self { demuxer }
    }
}

impl<D: Demuxer> AudioTrackLocator for DemuxLocator<D> {
    fn find_audio_track(&self, data: &[u8]) -> scanner::Result<Option<usize>> {
        let handle = self.demuxer.open_from_buffer(data).map_err(|e| {
            debug!("demuxer could not open buffer: {e}");
            ScanError::InvalidInput { len: data.len() }
        })?;
        let count = self.demuxer.stream_count(&handle);
        Ok((0..count).find(|&i| self.demuxer.stream_media_type(&handle, i) == MediaType::Audio))
    }

    fn name(&self) -> &'static str {
        "demux"
    }
}
