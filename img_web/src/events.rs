//! Events emitted by a batch run
//!
//! Observers (CLI, progress bar, JSON stream) only ever see these values; the
//! pipeline never touches any display state directly.

use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Success,
    Failure,
}

/// Result of attempting one input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    pub input_name: String,
    /// Present only on success.
    pub output_name: Option<String>,
    pub status: FileStatus,
    /// Present only on failure.
    pub error_detail: Option<String>,
    /// Size of the source file in bytes (0 if it could not be read).
    pub input_size: u64,
    pub output_size: Option<u64>,
    pub output_dimensions: Option<(u32, u32)>,
}

impl FileOutcome {
    pub fn success(
        input_name: impl Into<String>,
        output_name: impl Into<String>,
        input_size: u64,
        output_size: u64,
        output_dimensions: (u32, u32),
    ) -> Self {
        Self {
            input_name: input_name.into(),
            output_name: Some(output_name.into()),
            status: FileStatus::Success,
            error_detail: None,
            input_size,
            output_size: Some(output_size),
            output_dimensions: Some(output_dimensions),
        }
    }

    pub fn failure(input_name: impl Into<String>, error_detail: impl Into<String>, input_size: u64) -> Self {
        Self {
            input_name: input_name.into(),
            output_name: None,
            status: FileStatus::Failure,
            error_detail: Some(error_detail.into()),
            input_size,
            output_size: None,
            output_dimensions: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == FileStatus::Success
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total_files: usize,
    pub success_count: usize,
    pub output_directory: PathBuf,
    /// Set when cancellation stopped the run before every file was attempted.
    pub cancelled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BatchEvent {
    Started {
        total_files: usize,
    },
    /// `index` is 1-based: the number of files attempted so far, including this one.
    File {
        index: usize,
        outcome: FileOutcome,
    },
    Finished(BatchSummary),
}

impl BatchEvent {
    pub fn summary(&self) -> Option<&BatchSummary> {
        match self {
            BatchEvent::Finished(summary) => Some(summary),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_invariants() {
        let outcome = FileOutcome::success("a.jpg", "trip1.webp", 2048, 512, (1080, 540));
        assert!(outcome.is_success());
        assert_eq!(outcome.output_name.as_deref(), Some("trip1.webp"));
        assert!(outcome.error_detail.is_none());
    }

    #[test]
    fn test_failure_invariants() {
        let outcome = FileOutcome::failure("bad.png", "cannot decode", 12);
        assert!(!outcome.is_success());
        assert!(outcome.output_name.is_none());
        assert!(outcome.output_size.is_none());
        assert_eq!(outcome.error_detail.as_deref(), Some("cannot decode"));
    }

    #[test]
    fn test_event_json_shape() {
        let event = BatchEvent::File {
            index: 1,
            outcome: FileOutcome::failure("x.bmp", "boom", 3),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "file");
        assert_eq!(value["index"], 1);
        assert_eq!(value["outcome"]["status"], "failure");
        assert_eq!(value["outcome"]["error_detail"], "boom");

        let started = serde_json::to_value(BatchEvent::Started { total_files: 4 }).unwrap();
        assert_eq!(started, json!({"event": "started", "total_files": 4}));
    }

    #[test]
    fn test_finished_flattens_summary() {
        let event = BatchEvent::Finished(BatchSummary {
            total_files: 2,
            success_count: 1,
            output_directory: PathBuf::from("/p/listas_para_web"),
            cancelled: false,
        });
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "finished");
        assert_eq!(value["success_count"], 1);
        assert_eq!(value["output_directory"], "/p/listas_para_web");
        assert_eq!(event.summary().unwrap().total_files, 2);
    }
}
