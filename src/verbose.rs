//! Statistics and settings reports written to stderr.

use anyhow::{Context, Result};
use chunk_lines::{CallTimings, ChunkLinesError, Options, Stats};
use serde::Serialize;

use crate::args::Format;
use crate::output::Output;

/// Writes reports in the requested format.
#[derive(Debug)]
pub(crate) struct Verbose {
    output: Output,
    format: Format,
}

/// Settings and counters that can be serialized to both JSON and CSV.
#[derive(Serialize)]
struct VerboseData<'a> {
    #[serde(flatten)]
    stats: &'a Stats,
    chunk_size: usize,
    queue_capacity: usize,
    encoding: String,
    errors: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    timings: Option<CallTimings>,
}

impl VerboseData<'_> {
    /// Get all fields as name-value pairs.
    fn field_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(12);
        pairs.extend(self.stats.field_pairs());
        pairs.extend_from_slice(&[
            ("chunk_size", self.chunk_size.to_string()),
            ("queue_capacity", self.queue_capacity.to_string()),
            ("encoding", self.encoding.clone()),
            ("errors", self.errors.clone()),
        ]);
        if let Some(timings) = self.timings {
            pairs.push(("timings", timings.to_string()));
        }
        pairs
    }
}

impl Verbose {
    /// A reporter writing to stderr.
    pub(crate) fn new(format: Format) -> Self {
        Self {
            output: Output::stderr(),
            format,
        }
    }

    /// Writes reading statistics only.
    pub(crate) fn write_stats(&mut self, stats: &Stats) -> Result<()> {
        match self.format {
            Format::Json => self.write_json(stats),
            Format::Csv => self.write_csv(&stats.field_pairs()),
            Format::Text => self.write_text(&stats.field_pairs()),
        }
    }

    /// Writes settings alongside statistics, with call timings when measured.
    pub(crate) fn write_verbose(
        &mut self,
        stats: &Stats,
        options: &Options,
        chunk_size: usize,
        timings: Option<CallTimings>,
    ) -> Result<()> {
        let data = VerboseData {
            stats,
            chunk_size,
            queue_capacity: options.queue_capacity(),
            encoding: options.encoding().to_string(),
            errors: options.error_policy().to_string(),
            timings,
        };

        match self.format {
            Format::Json => self.write_json(&data),
            Format::Csv => self.write_csv(&data.field_pairs()),
            Format::Text => self.write_text(&data.field_pairs()),
        }
    }

    /// Write in JSON format.
    fn write_json<T: Serialize>(&mut self, data: &T) -> Result<()> {
        let json = serde_json::to_string(data).map_err(ChunkLinesError::Json)?;

        self.output
            .write_chunk(&format!("{json}\n"))
            .context("failed to write JSON output")
    }

    /// Write in CSV format.
    fn write_csv(&mut self, field_pairs: &[(&str, String)]) -> Result<()> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        writer
            .write_record(field_pairs.iter().map(|(name, _)| *name))
            .map_err(ChunkLinesError::Csv)?;
        writer
            .write_record(field_pairs.iter().map(|(_, value)| value))
            .map_err(ChunkLinesError::Csv)?;

        let data = writer
            .into_inner()
            .context("failed to finish CSV output")?;
        let csv = String::from_utf8(data).context("failed to convert output to UTF-8")?;

        self.output.write_chunk(&csv).context("failed to write output")
    }

    /// Write in text format, one `name value` pair per line.
    fn write_text(&mut self, field_pairs: &[(&str, String)]) -> Result<()> {
        field_pairs
            .iter()
            .try_for_each(|(field_name, value)| {
                self.output.write_chunk(&format!("{field_name} {value}\n"))
            })?;

        self.output.flush()
    }
}
