use std::fmt;

#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct FourCC(pub [u8; 4]);

pub const MOOV: FourCC = FourCC(*b"moov");
pub const TRAK: FourCC = FourCC(*b"trak");
pub const MDIA: FourCC = FourCC(*b"mdia");
pub const HDLR: FourCC = FourCC(*b"hdlr");
pub const SOUN: FourCC = FourCC(*b"soun");
pub const VIDE: FourCC = FourCC(*b"vide");

impl FourCC {
    pub fn as_str_lossy(&self) -> String {
        self.0.iter().map(|&c| if (32..=126).contains(&c) { c as char } else { '.' })
            .collect()
    }
    /// True when `bytes` starts with this code.
    pub fn matches(&self, bytes: &[u8]) -> bool {
        bytes.get(..4) == Some(&self.0[..])
    }
}
impl fmt::Debug for FourCC { fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.as_str_lossy()) } }
impl fmt::Display for FourCC { fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.as_str_lossy()) } }

#[derive(Debug, Clone)]
pub struct BoxHeader {
    pub size: u64,          // total size including header, or 0=to parent end
    pub typ: FourCC,
    pub header_size: u64,   // 8 or 16
    pub start: u64,         // buffer offset of header start
}

impl BoxHeader {
    /// End offset of the box, resolving `size == 0` against the parent.
    pub fn end(&self, parent_end: u64) -> u64 {
        if self.size == 0 { parent_end } else { self.start.saturating_add(self.size) }
    }

    pub fn payload_start(&self) -> u64 {
        self.start + self.header_size
    }
}

/// Decoded fields of a `hdlr` (Handler Reference) box up to the handler type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerRecord {
    pub version: u8,
    pub flags: u32,
    pub handler_type: FourCC,
}

/// Coarse classification of a track by its handler type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Audio,
    Video,
    Other,
}

impl From<FourCC> for MediaType {
    fn from(handler: FourCC) -> Self {
        match handler {
            SOUN => MediaType::Audio,
            VIDE => MediaType::Video,
            _ => MediaType::Other,
        }
    }
}
