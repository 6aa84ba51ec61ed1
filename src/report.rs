//! CSV result table, one row per simulated configuration.

use crate::error::Result;
use crate::simulator::SweepResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub const HEADER: [&str; 6] = [
    "Trace File",
    "Cache Size (KB)",
    "Block Size (Bytes)",
    "Associativity",
    "Hit Rate (%)",
    "Miss Rate (%)",
];

/// Written in place of a rate when the trace had no accesses.
pub const UNDEFINED_RATE: &str = "N/A";

fn rate(value: Option<f64>) -> String {
    value.map_or_else(|| UNDEFINED_RATE.to_string(), |v| format!("{v:.4}"))
}

/// Streams result rows to any writer. The header is written on construction.
pub struct ResultWriter<W: Write> {
    inner: csv::Writer<W>,
}

impl ResultWriter<File> {
    pub fn create(path: &Path) -> Result<Self> {
        Self::new(File::create(path)?)
    }
}

impl<W: Write> ResultWriter<W> {
    pub fn new(writer: W) -> Result<Self> {
        let mut inner = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);
        inner.write_record(HEADER)?;
        Ok(Self { inner })
    }

    pub fn write(&mut self, row: &SweepResult) -> Result<()> {
        self.inner.write_record([
            row.trace_id.clone(),
            row.cache_size_kb.to_string(),
            row.block_size_bytes.to_string(),
            row.associativity.to_string(),
            rate(row.hit_rate_percent),
            rate(row.miss_rate_percent),
        ])?;
        Ok(())
    }

    pub fn write_all<'a, I>(&mut self, rows: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a SweepResult>,
    {
        for row in rows {
            self.write(row)?;
        }
        Ok(())
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(self) -> Result<W> {
        self.inner
            .into_inner()
            .map_err(|e| std::io::Error::new(e.error().kind(), e.error().to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(trace: &str, hit: Option<f64>) -> SweepResult {
        SweepResult {
            trace_id: trace.into(),
            cache_size_kb: 1024,
            block_size_bytes: 4,
            associativity: 4,
            hit_rate_percent: hit,
            miss_rate_percent: hit.map(|h| 100.0 - h),
        }
    }

    fn render(rows: &[SweepResult]) -> String {
        let mut w = ResultWriter::new(Vec::new()).unwrap();
        w.write_all(rows).unwrap();
        String::from_utf8(w.finish().unwrap()).unwrap()
    }

    #[test]
    fn header_only() {
        assert_eq!(
            render(&[]),
            "Trace File,Cache Size (KB),Block Size (Bytes),Associativity,Hit Rate (%),Miss Rate (%)\n"
        );
    }

    #[test]
    fn rows_and_undefined_rates() {
        let out = render(&[row("gcc.trace", Some(75.0)), row("empty.trace", None)]);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "gcc.trace,1024,4,4,75.0000,25.0000");
        assert_eq!(lines[2], "empty.trace,1024,4,4,N/A,N/A");
    }

    #[test]
    fn trace_ids_with_commas_are_quoted() {
        let out = render(&[row("a,b.trace", Some(50.0))]);
        assert!(out.lines().nth(1).unwrap().starts_with("\"a,b.trace\","));
    }
}
