//! JSONL writer sink
//!
//! Streams one JSON object per line, record by record, so output is
//! greppable and loadable without reading the whole run into memory.
//! Works against any `Write`, file or stdout alike.

use std::io::Write;

use satd_core::{CommitMeta, LocatedResolution, PairOutcome, SatdInstance};
use serde::Serialize;

use crate::error::Result;
use crate::sink::ResolutionSink;

/// One output line: a record plus its commit context
#[derive(Serialize)]
struct RecordLine<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    old_commit: Option<&'a str>,
    commit: &'a CommitMeta,
    record: &'a SatdInstance,
}

/// Newline-delimited JSON sink over any writer
pub struct JsonlWriter<W: Write> {
    out: W,
}

impl<W: Write> JsonlWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Hand the underlying writer back (for buffered writers)
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &RecordLine<'_>) -> Result<()> {
        serde_json::to_writer(&mut self.out, line)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }
}

impl<W: Write> ResolutionSink for JsonlWriter<W> {
    fn write_pair(&mut self, outcome: &PairOutcome) -> Result<()> {
        for instance in &outcome.instances {
            self.write_line(&RecordLine {
                old_commit: Some(&outcome.old_hash),
                commit: &outcome.meta,
                record: instance,
            })?;
        }
        Ok(())
    }

    fn write_located(&mut self, batch: &[LocatedResolution]) -> Result<()> {
        for located in batch {
            self.write_line(&RecordLine {
                old_commit: None,
                commit: &located.commit,
                record: &located.instance,
            })?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}
