//! Tests for LineReader iteration, lifecycle and counters.

use std::io::{self, Cursor, Read, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use chunk_lines::{
    ChunkLinesError, Encoding, ErrorPolicy, Input, LineReader, Mode, Options, State, TimedExt,
};
use tempfile::NamedTempFile;

fn read_all(content: &[u8], options: &Options) -> Result<Vec<String>, ChunkLinesError> {
    LineReader::open(Input::from_bytes(content), options)?.collect()
}

fn expected_lines(content: &str) -> Vec<String> {
    let mut lines: Vec<String> = content.split('\n').map(String::from).collect();
    if lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines
}

/// Endless `abc\n` pattern, counting every byte handed out.
struct CountingReader {
    position: usize,
    limit: usize,
    served: Arc<AtomicUsize>,
}

impl CountingReader {
    fn new(limit: usize) -> (Self, Arc<AtomicUsize>) {
        let served = Arc::new(AtomicUsize::new(0));
        let reader = Self {
            position: 0,
            limit,
            served: Arc::clone(&served),
        };
        (reader, served)
    }
}

impl Read for CountingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.limit - self.position);
        for (offset, byte) in buf[..n].iter_mut().enumerate() {
            *byte = b"abc\n"[(self.position + offset) % 4];
        }
        self.position += n;
        self.served.fetch_add(n, Ordering::SeqCst);
        Ok(n)
    }
}

/// Serves `data`, then fails.
struct FailingReader {
    data: Cursor<Vec<u8>>,
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.data.read(buf)? {
            0 => Err(io::Error::other("disk on fire")),
            n => Ok(n),
        }
    }
}

#[test]
fn test_chunk_size_three_scenario() {
    let options = Options::default().with_chunk_size(3);
    let lines = read_all(b"ab\ncd\nef", &options).expect("read lines");
    assert_eq!(lines, ["ab", "cd", "ef"]);
}

#[test]
fn test_no_trailing_empty_line_scenario() {
    let options = Options::default().with_chunk_size(4);
    let lines = read_all(b"line1\nline2\n", &options).expect("read lines");
    assert_eq!(lines, ["line1", "line2"]);
}

#[test]
fn test_round_trip_every_chunk_size() {
    let inputs = [
        "",
        "\n",
        "\n\n",
        "a",
        "a\n",
        "ab\ncd\nef",
        "first line\n\nthird line\nlast without newline",
        "héllo\nwörld\n日本語のテキスト\n🦀 crab\n",
    ];

    for content in inputs {
        let expected = expected_lines(content);
        for chunk_size in 1..=content.len() + 3 {
            let options = Options::default().with_chunk_size(chunk_size);
            let lines = read_all(content.as_bytes(), &options).expect("read lines");
            assert_eq!(lines, expected, "content {content:?}, chunk size {chunk_size}");
        }
    }
}

#[test]
fn test_lines_rejoin_to_content() {
    let content = "alpha\nbeta\n\ngamma\ndelta\n";
    for chunk_size in [1, 2, 5, 6, 7, 64] {
        let options = Options::default().with_chunk_size(chunk_size);
        let lines = read_all(content.as_bytes(), &options).expect("read lines");
        assert_eq!(lines.join("\n"), content.strip_suffix('\n').unwrap_or(content));
    }
}

#[test]
fn test_last_partial_line_emitted_once() {
    let options = Options::default().with_chunk_size(2);
    let lines = read_all(b"one\ntwo", &options).expect("read lines");
    assert_eq!(lines, ["one", "two"]);
}

#[test]
fn test_carriage_returns_kept() {
    let lines = read_all(b"dos\r\nline\r\n", &Options::default()).expect("read lines");
    assert_eq!(lines, ["dos\r", "line\r"]);
}

#[test]
fn test_exhausted_reader_stays_exhausted() {
    let mut reader =
        LineReader::open(Input::from_bytes(b"x\ny\n"), &Options::default()).expect("open");

    assert_eq!(reader.by_ref().count(), 2);
    assert_eq!(reader.state(), State::Exhausted);
    assert_eq!(reader.next_line().expect("no error"), None);
    assert!(reader.next().is_none());
}

#[test]
fn test_closed_reader_fails() {
    let mut reader =
        LineReader::open(Input::from_bytes(b"x\ny\n"), &Options::default()).expect("open");

    assert_eq!(reader.next_line().expect("line"), Some("x".to_string()));
    reader.close();

    assert!(reader.is_closed());
    assert!(matches!(reader.next_line(), Err(ChunkLinesError::Closed)));
    assert!(matches!(reader.next(), Some(Err(ChunkLinesError::Closed))));
    assert!(matches!(reader.next(), Some(Err(ChunkLinesError::Closed))));
    assert!(reader.take(3).all(|result| result.is_err()));
}

#[test]
fn test_debug_shows_reader_state() {
    let options = Options::default().with_chunk_size(4);
    let mut reader = LineReader::open(Input::from_bytes(b"x\n"), &options).expect("open");
    assert_eq!(reader.next_line().expect("line"), Some("x".to_string()));

    let debug = format!("{reader:?}");
    assert!(debug.starts_with("LineReader {"), "{debug}");
    assert!(debug.contains("chunk_size: 4"), "{debug}");
    assert!(debug.contains("lines_emitted: 1"), "{debug}");
}

#[test]
fn test_huge_chunk_size_reads_whole_source() {
    for chunk_size in [usize::MAX, 1 << 40] {
        let options = Options::default().with_chunk_size(chunk_size);
        let lines = read_all(b"a\nb\n", &options).expect("read lines");
        assert_eq!(lines, ["a", "b"], "chunk size {chunk_size}");
    }
}

#[test]
fn test_close_is_idempotent() {
    let mut reader =
        LineReader::open(Input::from_bytes(b"x\n"), &Options::default()).expect("open");
    reader.close();
    reader.close();
    assert_eq!(reader.state(), State::Closed);
}

#[test]
fn test_close_before_first_pull() {
    let mut reader =
        LineReader::open(Input::from_bytes(b"x\n"), &Options::default()).expect("open");
    assert_eq!(reader.state(), State::Open);
    reader.close();

    let stats = reader.stats();
    assert_eq!(stats.lines, 0);
    assert_eq!(stats.bytes, 0);
    assert!(stats.time.abs() < f64::EPSILON);
}

#[test]
fn test_close_unblocks_producer_on_full_queue() {
    let (source, served) = CountingReader::new(64 * 1024 * 1024);
    let options = Options::default()
        .with_chunk_size(64)
        .with_queue_capacity(1);
    let mut reader = LineReader::open(Input::from_reader(None, source), &options).expect("open");

    assert_eq!(reader.next_line().expect("line"), Some("abc".to_string()));
    thread::sleep(Duration::from_millis(50));
    reader.close();

    let after_close = served.load(Ordering::SeqCst);
    thread::sleep(Duration::from_millis(50));
    assert_eq!(served.load(Ordering::SeqCst), after_close);
}

#[test]
fn test_queue_bounds_read_ahead() {
    let chunk_size = 64;
    let capacity = 2;
    let (source, served) = CountingReader::new(1024 * 1024);
    let options = Options::default()
        .with_chunk_size(chunk_size)
        .with_queue_capacity(capacity);
    let mut reader = LineReader::open(Input::from_reader(None, source), &options).expect("open");

    assert_eq!(reader.next_line().expect("line"), Some("abc".to_string()));
    thread::sleep(Duration::from_millis(200));

    // Queued chunks, one blocked in the producer, one held by the consumer.
    let bound = (capacity + 2) * chunk_size;
    assert!(served.load(Ordering::SeqCst) <= bound);

    let remaining = reader.by_ref().count();
    assert_eq!(remaining + 1, 1024 * 1024 / 4);
    assert_eq!(served.load(Ordering::SeqCst), 1024 * 1024);
}

#[test]
fn test_producer_error_reaches_consumer() {
    let source = FailingReader {
        data: Cursor::new(b"one\ntwo\nthree\npartial".to_vec()),
    };
    let options = Options::default().with_chunk_size(4);
    let mut reader = LineReader::open(Input::from_reader(Some("flaky.txt"), source), &options)
        .expect("open");

    let mut lines = Vec::new();
    let err = loop {
        match reader.next_line() {
            Ok(Some(line)) => lines.push(line),
            Ok(None) => panic!("expected a read error"),
            Err(err) => break err,
        }
    };

    assert_eq!(lines, ["one", "two", "three"]);
    assert!(matches!(err, ChunkLinesError::Io { .. }));
    assert!(err.to_string().contains("flaky.txt"));
    assert_eq!(reader.next_line().expect("iteration ended"), None);
}

#[test]
fn test_strict_policy_stops_at_invalid_bytes() {
    let options = Options::default()
        .with_chunk_size(5)
        .with_error_policy(ErrorPolicy::Strict);
    let mut reader = LineReader::open(Input::from_bytes(b"good\nbad\xFF\nmore\n"), &options)
        .expect("open");

    assert_eq!(reader.next_line().expect("line"), Some("good".to_string()));
    let err = reader.next_line().expect_err("invalid byte");
    assert!(err.is_decode());
    assert!(matches!(err, ChunkLinesError::Encoding { position: 8, .. }));
    assert_eq!(reader.next_line().expect("iteration ended"), None);
}

#[test]
fn test_replace_and_ignore_policies() {
    let content = b"ok\nbad\xFF\n";

    let replaced = read_all(content, &Options::default()).expect("replace");
    assert_eq!(replaced, ["ok", "bad\u{FFFD}"]);

    let ignored = read_all(
        content,
        &Options::default().with_error_policy(ErrorPolicy::Ignore),
    )
    .expect("ignore");
    assert_eq!(ignored, ["ok", "bad"]);
}

#[test]
fn test_latin1_encoding() {
    let encoding = Encoding::for_label("latin1").expect("latin1");
    let options = Options::default()
        .with_encoding(encoding)
        .with_chunk_size(3);
    let lines = read_all(b"caf\xE9\nna\xEFve", &options).expect("read lines");
    assert_eq!(lines, ["café", "naïve"]);
}

#[test]
fn test_utf16_encoding_across_boundaries() {
    let encoding = Encoding::for_label("utf-16le").expect("utf-16le");
    let content: Vec<u8> = "one\ntwo\nthree"
        .encode_utf16()
        .flat_map(u16::to_le_bytes)
        .collect();

    for chunk_size in [1, 3, 5, 64] {
        let options = Options::default()
            .with_encoding(encoding)
            .with_chunk_size(chunk_size);
        let lines = read_all(&content, &options).expect("read lines");
        assert_eq!(lines, ["one", "two", "three"]);
    }
}

#[test]
fn test_stats_for_file() {
    let mut temp_file = NamedTempFile::new().expect("create temp file");
    temp_file.write_all(b"a\nbb\nccc\n").expect("write test data");

    let mut reader = LineReader::open(temp_file.path(), &Options::default()).expect("open");
    assert_eq!(reader.mode(), Mode::Buffered);
    assert_eq!(reader.by_ref().count(), 3);

    let stats = reader.stats();
    assert_eq!(
        stats.file,
        temp_file
            .path()
            .file_name()
            .and_then(|name| name.to_str())
            .expect("file name")
    );
    assert_eq!(stats.mode, Mode::Buffered);
    assert_eq!(stats.lines, 3);
    assert_eq!(stats.bytes, 9);
    assert!(stats.time >= 0.0);

    let frozen = reader.stats();
    assert!((frozen.time - stats.time).abs() < f64::EPSILON);
}

#[test]
fn test_stats_names() {
    let reader = LineReader::open(Input::from_bytes(b""), &Options::default()).expect("open");
    assert_eq!(reader.stats().file, "<bytes>");

    let reader = LineReader::open(Input::from_reader(None, io::empty()), &Options::default())
        .expect("open");
    assert_eq!(reader.stats().file, "<stream>");

    let reader = LineReader::open(
        Input::from_reader(Some("/var/log/syslog"), io::empty()),
        &Options::default(),
    )
    .expect("open");
    assert_eq!(reader.file(), "syslog");
}

#[test]
fn test_stats_serialize_keys() {
    let mut reader =
        LineReader::open(Input::from_bytes(b"a\nb\n"), &Options::default()).expect("open");
    reader.by_ref().for_each(drop);

    let json = serde_json::to_value(reader.stats()).expect("serialize stats");
    for key in [
        "file",
        "mode",
        "lines",
        "bytes",
        "time",
        "lines_per_second",
        "megabytes_per_second",
    ] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
    assert_eq!(json["mode"], "buffered");
    assert_eq!(json["lines"], 2);
}

#[test]
fn test_directory_is_invalid_mode() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let result = LineReader::open(dir.path(), &Options::default());
    assert!(matches!(result, Err(ChunkLinesError::InvalidMode { .. })));
}

#[test]
fn test_missing_file() {
    let result = LineReader::open("/nonexistent/path/to/file.txt", &Options::default());
    let err = result.err().expect("should fail for nonexistent file");
    assert_eq!(err.to_string(), "no such file: /nonexistent/path/to/file.txt");
}

#[test]
fn test_zero_chunk_size_rejected() {
    let options = Options::default().with_chunk_size(0);
    let result = LineReader::open(Input::from_bytes(b"x"), &options);
    assert!(matches!(result, Err(ChunkLinesError::Config(_))));
}

#[test]
fn test_timed_iteration() {
    let reader =
        LineReader::open(Input::from_bytes(b"a\nb\nc"), &Options::default()).expect("open");
    let mut timed = reader.timed();

    let lines: Vec<String> = timed.by_ref().map(|line| line.expect("line")).collect();
    assert_eq!(lines, ["a", "b", "c"]);

    let timings = timed.timings();
    assert_eq!(timings.calls, 4);
    assert!(timings.slowest <= timings.total);
    assert_eq!(timed.get_ref().stats().lines, 3);
}

#[test]
fn test_input_descriptions() {
    let mut temp_file = NamedTempFile::new().expect("create temp file");
    temp_file.write_all(b"12345").expect("write test data");

    let file = Input::new(temp_file.path());
    assert_eq!(file.size(), Some(5));
    assert!(file.to_string().starts_with("File("));

    let stdin = Input::new("-");
    assert_eq!(stdin.source(), "-");
    assert_eq!(stdin.size(), None);

    let bytes = Input::from_bytes(b"abc");
    assert_eq!(bytes.size(), Some(3));
    assert_eq!(bytes.to_string(), "Bytes");

    let handle = Input::from_reader(Some("dir/data.gz"), io::empty());
    assert_eq!(handle.source(), "data.gz");
    assert_eq!(handle.compression(), chunk_lines::Compression::Gzip);
    assert_eq!(handle.size(), None);
    assert_eq!(handle.to_string(), "Handle(dir/data.gz)");
}
