use crate::boxes::{FourCC, HandlerRecord};
use byteorder::{BigEndian, ByteOrder};

/// Read-only, bounds-checked view over a borrowed byte buffer.
///
/// Every accessor takes an absolute offset and returns `None` when any byte
/// of the requested field lies outside the buffer, so an out-of-range read is
/// never representable. Multi-byte fields are decoded big-endian regardless
/// of host byte order.
#[derive(Debug, Clone, Copy)]
pub struct ByteReader<'a> {
    data: &'a [u8],
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn bytes(&self, offset: usize, len: usize) -> Option<&'a [u8]> {
        let end = offset.checked_add(len)?;
        self.data.get(offset..end)
    }

    pub fn u8_at(&self, offset: usize) -> Option<u8> {
        self.data.get(offset).copied()
    }

    pub fn u24_at(&self, offset: usize) -> Option<u32> {
        self.bytes(offset, 3).map(BigEndian::read_u24)
    }

    pub fn u32_at(&self, offset: usize) -> Option<u32> {
        self.bytes(offset, 4).map(BigEndian::read_u32)
    }

    pub fn fourcc_at(&self, offset: usize) -> Option<FourCC> {
        self.bytes(offset, 4).map(|b| FourCC([b[0], b[1], b[2], b[3]]))
    }

    /// True when the four bytes at `offset` spell `tag`.
    pub fn tag_at(&self, offset: usize, tag: FourCC) -> bool {
        self.bytes(offset, 4).is_some_and(|b| tag.matches(b))
    }

    /// Decode the handler record of an `hdlr` box whose payload starts at
    /// `payload`: version, 24-bit flags, a 32-bit (version 0) or 64-bit
    /// pre_defined field, then the handler type.
    pub fn handler_record(&self, payload: usize) -> Option<HandlerRecord> {
        let version = self.u8_at(payload)?;
        let pre_defined = if version == 0 { 4 } else { 8 };
        let type_pos = payload.checked_add(4 + pre_defined)?;
        let handler_type = self.fourcc_at(type_pos)?;
        let flags = self.u24_at(payload + 1)?;
        Some(HandlerRecord { version, flags, handler_type })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::{SOUN, TRAK};

    #[test]
    fn reads_are_big_endian() {
        let data = [0x00, 0x00, 0x01, 0x02, 0xff, 0xfe, 0xfd, 0xfc];
        let r = ByteReader::new(&data);
        assert_eq!(r.u32_at(0), Some(0x0102));
        assert_eq!(r.u24_at(1), Some(0x000102));
        assert_eq!(r.u32_at(4), Some(0xfffe_fdfc));
    }

    #[test]
    fn out_of_range_reads_are_none() {
        let data = [1u8, 2, 3, 4, 5];
        let r = ByteReader::new(&data);
        assert_eq!(r.u32_at(1), Some(0x02030405));
        assert_eq!(r.u32_at(2), None);
        assert_eq!(r.u8_at(5), None);
        assert_eq!(r.bytes(usize::MAX, 2), None);
        assert!(!r.tag_at(4, TRAK));
    }

    #[test]
    fn handler_record_respects_version_width() {
        // version 1: 8-byte pre_defined
        let mut v = vec![1u8, 0, 0, 7];
        v.extend_from_slice(&[0u8; 8]);
        v.extend_from_slice(b"soun");
        let r = ByteReader::new(&v);
        let h = r.handler_record(0).expect("handler");
        assert_eq!(h.version, 1);
        assert_eq!(h.flags, 7);
        assert_eq!(h.handler_type, SOUN);

        // same bytes read as version 0 would land inside pre_defined
        v[0] = 0;
        let r = ByteReader::new(&v);
        assert_eq!(r.handler_record(0).map(|h| h.handler_type), Some(FourCC([0; 4])));
    }

    #[test]
    fn truncated_handler_record_is_none() {
        let v = [0u8, 0, 0, 0, 0, 0, 0, 0, b's', b'o', b'u'];
        assert!(ByteReader::new(&v).handler_record(0).is_none());
    }
}
