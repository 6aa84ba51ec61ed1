//! Memory-access traces: `<l|s> <hex address> <gap>` per line.

use crate::error::{Result, SimError};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

/// Kind of access recorded in the trace. Carried through but never affects cache state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessKind {
    Load,
    Store,
}

/// One parsed trace line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    pub kind: AccessKind,
    pub address: u64,
    /// Instructions executed since the previous memory access.
    pub gap: i64,
}

impl TraceRecord {
    /// Parses one non-empty line. `line_no` is only used for error reporting.
    pub fn parse(line: &str, line_no: usize) -> Result<Self> {
        let err = |reason: String| SimError::TraceParse {
            line: line_no,
            reason,
        };
        let mut fields = line.split_whitespace();

        let kind = match fields.next() {
            Some("l") | Some("L") => AccessKind::Load,
            Some("s") | Some("S") => AccessKind::Store,
            Some(other) => return Err(err(format!("unknown access type {other:?}"))),
            None => return Err(err("empty line".into())),
        };

        let raw = fields.next().ok_or_else(|| err("missing address".into()))?;
        let hex = raw
            .strip_prefix("0x")
            .or_else(|| raw.strip_prefix("0X"))
            .unwrap_or(raw);
        let address =
            u64::from_str_radix(hex, 16).map_err(|e| err(format!("address {raw:?}: {e}")))?;

        // Gap is ignored by the model; tolerate traces that omit it.
        let gap = match fields.next() {
            Some(g) => g
                .parse::<i64>()
                .map_err(|e| err(format!("gap {g:?}: {e}")))?,
            None => 0,
        };

        if let Some(extra) = fields.next() {
            return Err(err(format!("unexpected field {extra:?}")));
        }
        Ok(Self { kind, address, gap })
    }
}

impl FromStr for TraceRecord {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, 1)
    }
}

/// A fully loaded trace.
#[derive(Clone, Debug, Default)]
pub struct TraceFile {
    /// Identifier written to the result table (the path as given).
    pub name: String,
    pub records: Vec<TraceRecord>,
}

impl TraceFile {
    pub fn load(path: &Path) -> Result<Self> {
        let unavailable = |source| SimError::TraceUnavailable {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(unavailable)?;
        Self::from_reader(path.display().to_string(), BufReader::new(file)).map_err(|e| match e {
            SimError::Io(source) => unavailable(source),
            other => other,
        })
    }

    /// Reads records from any buffered source. Blank lines are skipped.
    pub fn from_reader<R: BufRead>(name: impl Into<String>, reader: R) -> Result<Self> {
        let mut records = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(TraceRecord::parse(&line, i + 1)?);
        }
        Ok(Self {
            name: name.into(),
            records,
        })
    }

    pub fn addresses(&self) -> impl Iterator<Item = u64> + '_ {
        self.records.iter().map(|r| r.address)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parse_load_and_store() {
        let r: TraceRecord = "l 1fffff50 1".parse().unwrap();
        assert_eq!(
            r,
            TraceRecord {
                kind: AccessKind::Load,
                address: 0x1fff_ff50,
                gap: 1
            }
        );
        let r = TraceRecord::parse("s 0x30031f10 3", 1).unwrap();
        assert_eq!(r.kind, AccessKind::Store);
        assert_eq!(r.address, 0x3003_1f10);
        assert_eq!(r.gap, 3);
    }

    #[test]
    fn parse_tolerates_missing_gap_and_extra_spaces() {
        let r = TraceRecord::parse("  l\tDEADBEEF  ", 1).unwrap();
        assert_eq!(r.address, 0xdead_beef);
        assert_eq!(r.gap, 0);
    }

    #[test]
    fn parse_rejects_malformed_lines() {
        for line in ["x 10 1", "l", "l zz 1", "l 10 one", "l 10 1 extra"] {
            match TraceRecord::parse(line, 7) {
                Err(SimError::TraceParse { line, .. }) => assert_eq!(line, 7),
                other => panic!("{line:?} parsed as {other:?}"),
            }
        }
    }

    #[test]
    fn reader_skips_blank_lines() {
        let input = "l 0 1\n\ns 10 2\n   \nl 20 0\n";
        let trace = TraceFile::from_reader("mem", Cursor::new(input)).unwrap();
        assert_eq!(trace.name, "mem");
        assert_eq!(trace.len(), 3);
        assert_eq!(trace.addresses().collect::<Vec<_>>(), vec![0x0, 0x10, 0x20]);
    }

    #[test]
    fn reader_reports_line_number() {
        let input = "l 0 1\n\nq 10 2\n";
        match TraceFile::from_reader("bad", Cursor::new(input)) {
            Err(SimError::TraceParse { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_unavailable() {
        let err = TraceFile::load(Path::new("/nonexistent/trace-cache-sim/gcc.trace")).unwrap_err();
        assert!(matches!(err, SimError::TraceUnavailable { .. }));
    }
}
