use std::io::Cursor;

use super::*;

fn config(capacity: usize) -> SourceConfig {
    SourceConfig::new(capacity)
        .unwrap_or_default()
        .with_poll_interval(Duration::from_millis(5))
}

fn source(input: &str, capacity: usize) -> DoubleBufferedSource {
    match DoubleBufferedSource::new(Cursor::new(input.as_bytes().to_vec()), config(capacity)) {
        Ok(source) => source,
        Err(err) => panic!("cannot start source: {err}"),
    }
}

fn drain(source: &mut DoubleBufferedSource) -> Vec<u8> {
    let mut out = Vec::new();
    while let Some(b) = source.next_char() {
        out.push(b);
    }
    out
}

/// Hands out at most one byte per `read`, pausing before each.
struct Trickle {
    bytes: Vec<u8>,
    pos: usize,
    pause: Duration,
}

impl Read for Trickle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        thread::sleep(self.pause);
        match (self.bytes.get(self.pos), buf.first_mut()) {
            (Some(&b), Some(slot)) => {
                *slot = b;
                self.pos += 1;
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

/// Delivers `good` and then fails.
struct FailAfter {
    good: Cursor<Vec<u8>>,
}

impl Read for FailAfter {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.good.read(buf)? {
            0 => Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed")),
            n => Ok(n),
        }
    }
}

/// Interrupted on every other call.
struct Flaky {
    inner: Cursor<Vec<u8>>,
    interrupt: bool,
}

impl Read for Flaky {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.interrupt = !self.interrupt;
        if self.interrupt {
            return Err(io::Error::from(io::ErrorKind::Interrupted));
        }
        self.inner.read(buf)
    }
}

struct Explodes;

impl Read for Explodes {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        panic!("reader exploded");
    }
}

// === Draining ===

#[test]
fn drains_every_byte_for_small_capacities() {
    let input = "program demo; begin end.";
    for capacity in 1..=8 {
        let mut src = source(input, capacity);
        assert_eq!(drain(&mut src), input.as_bytes(), "capacity {capacity}");
    }
}

#[test]
fn capacity_larger_than_input() {
    let mut src = source("abc", 4096);
    assert_eq!(drain(&mut src), b"abc");
}

#[test]
fn empty_input_is_immediately_exhausted() {
    let mut src = source("", 4);
    assert_eq!(src.next_char(), None);
    assert!(src.is_exhausted());
}

#[test]
fn end_of_input_is_sticky() {
    let mut src = source("x", 1);
    assert_eq!(src.next_char(), Some(b'x'));
    for _ in 0..3 {
        assert_eq!(src.next_char(), None);
    }
}

#[test]
fn slow_reader_is_waited_for() {
    let reader = Trickle {
        bytes: b"slowly".to_vec(),
        pos: 0,
        pause: Duration::from_millis(3),
    };
    let mut src = match DoubleBufferedSource::new(reader, config(4)) {
        Ok(src) => src,
        Err(err) => panic!("cannot start source: {err}"),
    };
    assert_eq!(drain(&mut src), b"slowly");
    assert!(src.close().is_ok());
}

#[test]
fn interrupted_reads_are_retried() {
    let reader = Flaky {
        inner: Cursor::new(b"retry me".to_vec()),
        interrupt: false,
    };
    let mut src = match DoubleBufferedSource::new(reader, config(3)) {
        Ok(src) => src,
        Err(err) => panic!("cannot start source: {err}"),
    };
    assert_eq!(drain(&mut src), b"retry me");
    assert!(src.close().is_ok());
}

// === Pushback ===

#[test]
fn push_back_at_start_fails() {
    let mut src = source("abc", 2);
    assert!(!src.push_back());
    assert_eq!(src.next_char(), Some(b'a'));
}

#[test]
fn push_back_rereads_last_byte() {
    let mut src = source("abc", 8);
    assert_eq!(src.next_char(), Some(b'a'));
    assert_eq!(src.next_char(), Some(b'b'));
    assert!(src.push_back());
    assert_eq!(src.next_char(), Some(b'b'));
    assert_eq!(src.next_char(), Some(b'c'));
}

#[test]
fn second_push_back_in_a_row_fails() {
    let mut src = source("abc", 8);
    assert_eq!(src.next_char(), Some(b'a'));
    assert_eq!(src.next_char(), Some(b'b'));
    assert!(src.push_back());
    assert!(!src.push_back());
    assert_eq!(src.next_char(), Some(b'b'));
}

#[test]
fn push_back_crosses_into_previous_slot() {
    // Capacity 2: "ab" | "cd". Reading `b` finishes slot 0.
    let mut src = source("abcd", 2);
    assert_eq!(src.next_char(), Some(b'a'));
    assert_eq!(src.next_char(), Some(b'b'));
    assert!(src.push_back());
    assert_eq!(src.next_char(), Some(b'b'));
    assert_eq!(src.next_char(), Some(b'c'));
    assert!(src.push_back());
    assert_eq!(src.next_char(), Some(b'c'));
    assert_eq!(src.next_char(), Some(b'd'));
    assert_eq!(src.next_char(), None);
}

#[test]
fn peek_after_every_byte_never_loses_data() {
    let input = "x := 3 <> 4; { c } 'it''s'";
    for capacity in 1..=5 {
        let mut src = source(input, capacity);
        let mut out = Vec::new();
        while let Some(b) = src.next_char() {
            assert!(src.push_back(), "capacity {capacity}: push_back after {b:?}");
            assert_eq!(src.next_char(), Some(b));
            out.push(b);
        }
        assert_eq!(out, input.as_bytes(), "capacity {capacity}");
    }
}

#[test]
fn push_back_after_end_of_input_fails() {
    let mut src = source("a", 1);
    assert_eq!(src.next_char(), Some(b'a'));
    assert_eq!(src.next_char(), None);
    assert!(!src.push_back());
    assert_eq!(src.next_char(), None);
}

// === Setup and teardown ===

#[test]
fn open_missing_file_fails_synchronously() {
    let result = DoubleBufferedSource::open("/definitely/not/here.pas", config(4));
    match result {
        Err(SourceError::Open { path, .. }) => {
            assert_eq!(path, Path::new("/definitely/not/here.pas"));
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("opening a missing file succeeded"),
    }
}

#[test]
fn close_after_clean_end_is_ok() {
    let mut src = source("done", 2);
    assert_eq!(drain(&mut src), b"done");
    assert!(src.close().is_ok());
}

#[test]
fn read_error_looks_like_end_and_is_reported_on_close() {
    let reader = FailAfter {
        good: Cursor::new(b"abcdef".to_vec()),
    };
    let mut src = match DoubleBufferedSource::new(reader, config(4)) {
        Ok(src) => src,
        Err(err) => panic!("cannot start source: {err}"),
    };
    assert_eq!(drain(&mut src), b"abcdef");
    match src.close() {
        Err(SourceError::Read { offset, source }) => {
            assert_eq!(offset, 6);
            assert_eq!(source.kind(), io::ErrorKind::BrokenPipe);
        }
        other => panic!("expected a read error, got {other:?}"),
    }
}

#[test]
fn panicking_reader_ends_input_and_is_reported() {
    let mut src = match DoubleBufferedSource::new(Explodes, config(4)) {
        Ok(src) => src,
        Err(err) => panic!("cannot start source: {err}"),
    };
    assert_eq!(src.next_char(), None);
    assert!(matches!(src.close(), Err(SourceError::FillerPanicked)));
}

#[test]
fn dropping_early_releases_the_fill_thread() {
    let input = "a".repeat(10_000);
    let mut src = source(&input, 1);
    assert_eq!(src.next_char(), Some(b'a'));
    drop(src);
}

#[test]
fn close_before_end_stops_the_fill_thread() {
    let input = "b".repeat(10_000);
    let mut src = source(&input, 2);
    assert_eq!(src.next_char(), Some(b'b'));
    assert!(src.close().is_ok());
}
