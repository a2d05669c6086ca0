mod common;

use common::{boxed, ftyp, mp4};
use std::io::Cursor;
use trakfind::boxes::{FourCC, SOUN, TRAK, VIDE};
use trakfind::parser::{parse_children, read_box_header, read_handler, tracks};

#[test]
fn read_single_ftyp_header() {
    let data = ftyp();
    let mut cur = Cursor::new(data);

    let hdr = read_box_header(&mut cur).expect("read_box_header failed");

    assert_eq!(hdr.start, 0);
    assert_eq!(hdr.size, 24);
    assert_eq!(hdr.typ, FourCC(*b"ftyp"));
    assert_eq!(hdr.header_size, 8);
}

#[test]
fn read_largesize_header() {
    let mut v = Vec::new();
    v.extend_from_slice(&1u32.to_be_bytes());
    v.extend_from_slice(b"mdat");
    v.extend_from_slice(&24u64.to_be_bytes());
    v.extend_from_slice(&[0u8; 8]);

    let hdr = read_box_header(&mut Cursor::new(v)).expect("read_box_header failed");
    assert_eq!(hdr.size, 24);
    assert_eq!(hdr.header_size, 16);
    assert_eq!(hdr.payload_start(), 16);
}

#[test]
fn undersized_header_is_rejected() {
    let mut v = Vec::new();
    v.extend_from_slice(&7u32.to_be_bytes());
    v.extend_from_slice(b"free");
    assert!(read_box_header(&mut Cursor::new(v)).is_err());
}

#[test]
fn parse_children_walks_by_size() {
    let data = [ftyp(), boxed(b"free", b"trakhdlr"), boxed(b"mdat", &[1, 2, 3])].concat();
    let len = data.len() as u64;
    let mut cur = Cursor::new(data);

    let kids = parse_children(&mut cur, 0, len).expect("parse_children failed");
    let types: Vec<String> = kids.iter().map(|k| k.typ.to_string()).collect();
    assert_eq!(types, ["ftyp", "free", "mdat"]);
    assert_eq!(kids[2].start, 24 + 16);
}

#[test]
fn read_handler_fields() {
    let payload = [0u8, 0, 0, 1, 0, 0, 0, 0, b'v', b'i', b'd', b'e'];
    let h = read_handler(&mut Cursor::new(payload)).expect("read_handler failed");
    assert_eq!(h.version, 0);
    assert_eq!(h.flags, 1);
    assert_eq!(h.handler_type, VIDE);
}

#[test]
fn tracks_lists_handlers_in_order() {
    let data = mp4(&[b"vide", b"soun"]);
    let t = tracks(&data).expect("tracks failed");
    assert_eq!(t.len(), 2);
    assert_eq!(t[0].handler.map(|h| h.handler_type), Some(VIDE));
    assert_eq!(t[1].handler.map(|h| h.handler_type), Some(SOUN));
    assert!(t[0].header.start < t[1].header.start);
    assert_eq!(t[0].header.typ, TRAK);
}
