pub mod boxes;
pub mod demux;
pub mod ffi;
pub mod locator;
pub mod parser;
pub mod reader;
pub mod scanner;

pub use boxes::{BoxHeader, FourCC, HandlerRecord, MediaType};
pub use demux::{BoxTreeDemuxer, DemuxLocator, Demuxer};
pub use locator::{AudioTrackLocator, ScanMode, ScanOptions, ScanOutcome, SignatureScanner, StructuralScanner};
pub use reader::ByteReader;
pub use scanner::{ScanError, find_audio_track_index};
