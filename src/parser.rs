use crate::boxes::{BoxHeader, FourCC, HDLR, HandlerRecord, MDIA, MOOV, TRAK};
use byteorder::{BigEndian, ReadBytesExt};
use log::{debug, trace};
use std::io::{Cursor, Read, Seek, SeekFrom};

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid box size {size} at offset {start:#x}")]
    InvalidSize { start: u64, size: u64 },
}

pub type Result<T> = std::result::Result<T, ParseError>;

pub fn read_box_header<R: Read + Seek>(r: &mut R) -> Result<BoxHeader> {
    let start = r.stream_position()?;
    let size32 = r.read_u32::<BigEndian>()?;
    let mut typ = [0u8; 4]; r.read_exact(&mut typ)?;
    let mut size = size32 as u64;

    if size32 == 1 {
        size = r.read_u64::<BigEndian>()?;
    }

    let header_size = if size32 == 1 { 16 } else { 8 };

    if size != 0 && size < header_size {
        return Err(ParseError::InvalidSize { start, size });
    }

    Ok(BoxHeader { size, typ: FourCC(typ), header_size, start })
}

/// Headers of the boxes laid out back to back in `start..parent_end`.
///
/// The walk advances by each box's declared size and stops quietly at the
/// first header that cannot be read or is malformed. A box overrunning its
/// parent is kept but the walk ends with it.
pub fn parse_children<R: Read + Seek>(r: &mut R, start: u64, parent_end: u64) -> Result<Vec<BoxHeader>> {
    let mut kids = Vec::new();
    r.seek(SeekFrom::Start(start))?;
    while r.stream_position()? + 8 <= parent_end {
        let h = match read_box_header(r) {
            Ok(h) => h,
            Err(e) => {
                trace!("stopping walk before {parent_end:#x}: {e}");
                break;
            }
        };
        let box_end = h.end(parent_end);
        kids.push(h);
        if box_end >= parent_end {
            break;
        }
        r.seek(SeekFrom::Start(box_end))?;
    }
    Ok(kids)
}

/// One `trak` found by the structural walk.
#[derive(Debug, Clone)]
pub struct TrackEntry {
    pub header: BoxHeader,
    /// Handler of the track's `mdia/hdlr`, when present and readable.
    pub handler: Option<HandlerRecord>,
}

/// Walk `moov/trak/mdia/hdlr` and list the tracks in file order.
pub fn tracks(data: &[u8]) -> Result<Vec<TrackEntry>> {
    let end = data.len() as u64;
    let mut r = Cursor::new(data);
    let mut out = Vec::new();

    for moov in parse_children(&mut r, 0, end)?.into_iter().filter(|b| b.typ == MOOV) {
        let moov_end = moov.end(end).min(end);
        for trak in parse_children(&mut r, moov.payload_start(), moov_end)?.into_iter().filter(|b| b.typ == TRAK) {
            let handler = track_handler(&mut r, &trak, moov_end)?;
            debug!(
                "trak #{} at {:#x}: handler {}",
                out.len(),
                trak.start,
                handler.map(|h| h.handler_type.to_string()).unwrap_or_else(|| "-".into())
            );
            out.push(TrackEntry { header: trak, handler });
        }
    }
    Ok(out)
}

fn track_handler<R: Read + Seek>(r: &mut R, trak: &BoxHeader, parent_end: u64) -> Result<Option<HandlerRecord>> {
    let trak_end = trak.end(parent_end).min(parent_end);
    let Some(mdia) = find_child(r, trak.payload_start(), trak_end, MDIA)? else {
        return Ok(None);
    };
    let mdia_end = mdia.end(trak_end).min(trak_end);
    let Some(hdlr) = find_child(r, mdia.payload_start(), mdia_end, HDLR)? else {
        return Ok(None);
    };
    r.seek(SeekFrom::Start(hdlr.payload_start()))?;
    Ok(read_handler(r).ok())
}

fn find_child<R: Read + Seek>(r: &mut R, start: u64, end: u64, typ: FourCC) -> Result<Option<BoxHeader>> {
    Ok(parse_children(r, start, end)?.into_iter().find(|b| b.typ == typ))
}

/// Read a handler record (version, flags, pre_defined, handler_type) at the
/// current position.
pub fn read_handler<R: Read>(r: &mut R) -> Result<HandlerRecord> {
    let version = r.read_u8()?;
    let flags = r.read_u24::<BigEndian>()?;
    if version == 0 {
        r.read_u32::<BigEndian>()?;
    } else {
        r.read_u64::<BigEndian>()?;
    }
    let mut typ = [0u8; 4];
    r.read_exact(&mut typ)?;
    Ok(HandlerRecord { version, flags, handler_type: FourCC(typ) })
}
