//! Append-only JSONL event log.
//!
//! Consumers that want a durable feed subscribe here; each line is one
//! engine event wrapped with a wall-clock stamp. The stamp exists only in
//! the persisted file, never in simulation state.

use crate::error::Result;
use chrono::Utc;
use ecogenesis_core::SimEvent;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoggedEvent {
    pub timestamp: String,
    #[serde(flatten)]
    pub event: SimEvent,
}

pub struct EventLog {
    writer: BufWriter<File>,
}

impl EventLog {
    /// Open (or create) a log file for appending.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(dir) = path.as_ref().parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    pub fn log_event(&mut self, event: SimEvent) -> Result<()> {
        let logged = LoggedEvent {
            timestamp: Utc::now().to_rfc3339(),
            event,
        };
        let line = serde_json::to_string(&logged)?;
        writeln!(self.writer, "{}", line)?;
        Ok(())
    }

    pub fn log_all(&mut self, events: Vec<SimEvent>) -> Result<usize> {
        let count = events.len();
        for event in events {
            self.log_event(event)?;
        }
        self.flush()?;
        Ok(count)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_log_path(tag: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("ecogenesis-{}-{}.jsonl", tag, Uuid::new_v4()))
    }

    #[test]
    fn test_log_appends_one_line_per_event() {
        let path = temp_log_path("events");
        let mut log = EventLog::open(&path).unwrap();
        let events = vec![
            SimEvent::SpeciesExtinct {
                species_id: Uuid::new_v4(),
                year: 10,
                cause: "population_collapse".to_string(),
            },
            SimEvent::MassExtinctionDetected {
                year: 10,
                recovery_years: 20_000,
            },
        ];
        assert_eq!(log.log_all(events).unwrap(), 2);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        let first: LoggedEvent = serde_json::from_str(content.lines().next().unwrap()).unwrap();
        assert!(matches!(first.event, SimEvent::SpeciesExtinct { .. }));
        std::fs::remove_file(&path).ok();
    }
}
