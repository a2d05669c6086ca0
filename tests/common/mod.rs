//! Builders for synthetic ISOBMFF buffers.
#![allow(dead_code)]

/// Plain box: 32-bit size, 4CC, payload.
pub fn boxed(typ: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut v = Vec::with_capacity(8 + payload.len());
    v.extend_from_slice(&(8 + payload.len() as u32).to_be_bytes());
    v.extend_from_slice(typ);
    v.extend_from_slice(payload);
    v
}

pub fn ftyp() -> Vec<u8> {
    let mut p = Vec::new();
    p.extend_from_slice(b"isom");
    p.extend_from_slice(&512u32.to_be_bytes());
    p.extend_from_slice(b"isom");
    p.extend_from_slice(b"mp41");
    boxed(b"ftyp", &p)
}

/// `hdlr` full box; version 0 carries a 4-byte pre_defined, anything else 8.
pub fn hdlr(version: u8, handler: &[u8; 4]) -> Vec<u8> {
    let mut p = vec![version, 0, 0, 0];
    let pre_defined = if version == 0 { 4 } else { 8 };
    p.extend(std::iter::repeat_n(0u8, pre_defined));
    p.extend_from_slice(handler);
    p.extend_from_slice(&[0u8; 12]);
    p.extend_from_slice(b"Handler\0");
    boxed(b"hdlr", &p)
}

pub fn tkhd() -> Vec<u8> {
    boxed(b"tkhd", &[0u8; 84])
}

pub fn mdhd() -> Vec<u8> {
    boxed(b"mdhd", &[0u8; 24])
}

/// `trak/{tkhd, mdia/{mdhd, hdlr}}` with a version 0 handler.
pub fn trak(handler: &[u8; 4]) -> Vec<u8> {
    trak_with_hdlr(hdlr(0, handler))
}

pub fn trak_with_hdlr(hdlr: Vec<u8>) -> Vec<u8> {
    let mdia = boxed(b"mdia", &[mdhd(), hdlr].concat());
    boxed(b"trak", &[tkhd(), mdia].concat())
}

pub fn moov(traks: &[Vec<u8>]) -> Vec<u8> {
    let mut p = boxed(b"mvhd", &[0u8; 100]);
    for t in traks {
        p.extend_from_slice(t);
    }
    boxed(b"moov", &p)
}

/// `ftyp` + `moov` with one `trak` per handler, then a small `mdat`.
pub fn mp4(handlers: &[&[u8; 4]]) -> Vec<u8> {
    let traks: Vec<Vec<u8>> = handlers.iter().map(|h| trak(h)).collect();
    [ftyp(), moov(&traks), boxed(b"mdat", &[0xAB; 32])].concat()
}
