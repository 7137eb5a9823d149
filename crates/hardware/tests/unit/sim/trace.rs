//! Trace Reader Tests.
//!
//! Verifies record parsing, read filtering, chunking of over-sized reads, and
//! error reporting with line numbers.

use std::io::Cursor;

use pretty_assertions::assert_eq;
use rstest::rstest;

use cachesim_core::common::error::TraceError;
use cachesim_core::sim::trace::{ReadRecord, parse_record, read_addresses};
use cachesim_core::sim::TraceReader;

// ══════════════════════════════════════════════════════════
// 1. Record parsing
// ══════════════════════════════════════════════════════════

#[rstest]
#[case("1: 0, 0, 0, 8, 7f00a0, 400000", Some(ReadRecord { addr: 0x7f_00a0, size: 8 }))]
#[case("22: 3, 1, 0, 4, 0x1000, 400004", Some(ReadRecord { addr: 0x1000, size: 4 }))]
#[case("22:3,1,0,130,ABC,0", Some(ReadRecord { addr: 0xabc, size: 130 }))]
#[case("1: 0, 0, 1, 8, 7f00a0, 400000", None)]
#[case("1: 0, 0, 10, 8, 7f00a0, 400000", None)]
#[case("1: 0, 0, , 8, 7f00a0, 400000", None)]
#[case("", None)]
#[case("   ", None)]
fn parses_records(#[case] line: &str, #[case] expected: Option<ReadRecord>) {
    assert_eq!(parse_record(line, 1).unwrap(), expected);
}

#[rstest]
#[case("1: 0, 0")]
#[case("1: 0, 0, x, 8, 7f00a0, 400000")]
#[case("1: 0, 0, 0, big, 7f00a0, 400000")]
#[case("1: 0, 0, 0, 8, zz, 400000")]
fn rejects_malformed_records(#[case] line: &str) {
    match parse_record(line, 7) {
        Err(TraceError::Malformed { line: 7, .. }) => {}
        other => panic!("expected Malformed at line 7, got {other:?}"),
    }
}

// ══════════════════════════════════════════════════════════
// 2. Streaming
// ══════════════════════════════════════════════════════════

const TRACE: &str = "\
1: 0, 0, 0, 8, 1000, 400000
2: 0, 0, 1, 8, 1800, 400004

3: 0, 0, 0, 130, 2000, 400008
4: 1, 0, 0, 64, 3000, 40000c
";

#[test]
fn reads_are_chunked_by_line_size() {
    let addrs = read_addresses(Cursor::new(TRACE), 64).unwrap();
    assert_eq!(addrs, vec![0x1000, 0x2000, 0x2040, 0x2080, 0x3000]);
}

#[test]
fn smaller_chunks_split_more() {
    let addrs = read_addresses(Cursor::new(TRACE), 32).unwrap();
    assert_eq!(
        addrs,
        vec![
            0x1000, 0x2000, 0x2020, 0x2040, 0x2060, 0x2080, 0x3000, 0x3020
        ]
    );
}

#[test]
fn reader_counts_lines() {
    let mut reader = TraceReader::new(Cursor::new(TRACE), 64);
    assert_eq!(reader.next().unwrap().unwrap(), 0x1000);
    assert_eq!(reader.lines_read(), 1);
    assert_eq!(reader.by_ref().count(), 4);
    assert_eq!(reader.lines_read(), 5);
}

#[test]
fn malformed_line_reports_its_number() {
    let text = "1: 0, 0, 0, 8, 1000, 0\n2: 0, 0, 0, 8, 2000, 0\n3: broken\n";
    let mut reader = TraceReader::new(Cursor::new(text), 64);
    assert_eq!(reader.next().unwrap().unwrap(), 0x1000);
    assert_eq!(reader.next().unwrap().unwrap(), 0x2000);
    assert!(matches!(
        reader.next(),
        Some(Err(TraceError::Malformed { line: 3, .. }))
    ));
}

#[test]
fn empty_trace_yields_nothing() {
    assert!(read_addresses(Cursor::new(""), 64).unwrap().is_empty());
}
