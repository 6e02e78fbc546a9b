//! Shared benchmark utilities.

use std::io::Write;
use std::time::Duration;

use chunk_lines::{LineReader, Options};
use criterion::{BenchmarkGroup, Criterion, Throughput, measurement::WallTime};
use fake::Fake;
use fake::faker::lorem::en::Words;
use tempfile::NamedTempFile;

/// Generate random newline-terminated text of roughly `size_kb` kilobytes.
#[must_use]
pub fn generate_sample_text(size_kb: usize) -> String {
    let target = size_kb * 1024;
    let mut text = String::with_capacity(target + 128);

    while text.len() < target {
        text.push_str(&Words(5..15).fake::<Vec<String>>().join(" "));
        text.push('\n');
    }

    text
}

/// Write `bytes` to a temporary file with the given suffix.
///
/// # Panics
///
/// Panics if the temporary file cannot be created or written.
#[must_use]
pub fn create_benchmark_file(suffix: &str, bytes: &[u8]) -> NamedTempFile {
    let mut temp_file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create benchmark file");
    temp_file
        .write_all(bytes)
        .expect("write benchmark file");
    temp_file.flush().expect("flush benchmark file");
    temp_file
}

/// Standard Criterion configuration.
#[must_use]
pub fn standard_criterion_config() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(15)
        .measurement_time(Duration::from_secs(3))
        .warm_up_time(Duration::from_secs(1))
}

/// Create a group measuring throughput over `bytes` of decoded text.
pub fn create_bench_group<'a>(
    c: &'a mut Criterion,
    name: &str,
    bytes: usize,
) -> BenchmarkGroup<'a, WallTime> {
    let mut group = c.benchmark_group(name);
    group.throughput(Throughput::Bytes(bytes as u64));
    group
}

/// Read every line of `temp_file`, returning the line count.
///
/// # Panics
///
/// Panics if the file cannot be opened or read.
pub fn count_lines(temp_file: &NamedTempFile, options: &Options) -> usize {
    let reader = LineReader::open(temp_file.path(), options).expect("open benchmark file");
    reader
        .map(|line| line.expect("read benchmark line"))
        .count()
}
