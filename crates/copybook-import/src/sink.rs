//! Record sinks.

use std::io::{self, Write};

use copybook_record::Record;

/// Destination for parsed records.
///
/// The runner hands over every successfully parsed record and flushes
/// once per job; implementations decide batching.
pub trait RecordSink {
    /// Take ownership of one parsed record's output representation.
    fn accept(&mut self, record: &dyn Record) -> io::Result<()>;

    /// Write out anything buffered.
    fn flush(&mut self) -> io::Result<()>;
}

/// Writes records as one JSON object per line, buffered in batches.
pub struct JsonLinesSink<W: Write> {
    out: W,
    pending: Vec<serde_json::Value>,
    batch_size: usize,
}

impl<W: Write> JsonLinesSink<W> {
    /// Create a sink flushing every `batch_size` records.
    pub fn new(out: W, batch_size: usize) -> Self {
        Self {
            out,
            pending: Vec::new(),
            batch_size: batch_size.max(1),
        }
    }
}

impl<W: Write> RecordSink for JsonLinesSink<W> {
    fn accept(&mut self, record: &dyn Record) -> io::Result<()> {
        self.pending.push(record.to_json());
        if self.pending.len() >= self.batch_size {
            self.flush()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        for value in self.pending.drain(..) {
            writeln!(self.out, "{value}")?;
        }
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Policy;

    #[test]
    fn test_jsonl_output_shape() {
        let mut buffer = Vec::new();
        {
            let mut sink = JsonLinesSink::new(&mut buffer, 10);
            let mut policy = Policy::default();
            policy.policy_number = Some("POL-1".into());
            sink.accept(&policy).unwrap();
            sink.flush().unwrap();
        }
        let text = String::from_utf8(buffer).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(parsed["PolicyNumber"], "POL-1");
        assert!(parsed["HolderName"].is_null());
    }

    #[test]
    fn test_batching_defers_writes() {
        let mut buffer = Vec::new();
        {
            let mut sink = JsonLinesSink::new(&mut buffer, 3);
            let policy = Policy::default();
            sink.accept(&policy).unwrap();
            sink.accept(&policy).unwrap();
        }
        // batch of 3 never filled and flush was not called
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_batch_boundary_flushes() {
        let mut buffer = Vec::new();
        {
            let mut sink = JsonLinesSink::new(&mut buffer, 2);
            let policy = Policy::default();
            sink.accept(&policy).unwrap();
            sink.accept(&policy).unwrap();
        }
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.lines().count(), 2);
    }
}
