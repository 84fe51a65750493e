//! Event logger that serializes records to any `io::Write`.

use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::io::{self, Write};

use super::schema::Event;
use super::traits::{stamp_missing_timestamp, EventLogger};

/// Writes one JSON document per record. Compact output is NDJSON; pretty
/// output separates records with a newline.
pub struct WriterEventLogger<W: Write + Send> {
    writer: Mutex<W>,
    pretty: bool,
    stamp_timestamp: bool,
}

impl WriterEventLogger<io::Stdout> {
    pub fn stdout(pretty: bool, stamp_timestamp: bool) -> Self {
        Self::new(io::stdout(), pretty, stamp_timestamp)
    }
}

impl WriterEventLogger<io::Stderr> {
    pub fn stderr(pretty: bool, stamp_timestamp: bool) -> Self {
        Self::new(io::stderr(), pretty, stamp_timestamp)
    }
}

impl<W: Write + Send> WriterEventLogger<W> {
    pub fn new(writer: W, pretty: bool, stamp_timestamp: bool) -> Self {
        Self {
            writer: Mutex::new(writer),
            pretty,
            stamp_timestamp,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write + Send> EventLogger for WriterEventLogger<W> {
    fn log_event(&self, mut event: Event) -> Result<()> {
        if self.stamp_timestamp {
            stamp_missing_timestamp(&mut event);
        }

        let line = if self.pretty {
            serde_json::to_string_pretty(&event)
        } else {
            serde_json::to_string(&event)
        }
        .context("Failed to serialize event record")?;

        let mut writer = self.writer.lock();
        writeln!(writer, "{line}").context("Failed to write event record")?;
        writer.flush().context("Failed to flush event record")?;
        Ok(())
    }

    fn name(&self) -> &str {
        if self.pretty {
            "writer-pretty"
        } else {
            "writer"
        }
    }
}
