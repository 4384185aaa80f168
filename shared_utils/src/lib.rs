//! Shared Utilities for img-web tools
//!
//! This crate provides common functionality shared by the img-web binaries:
//! - File collection by extension and ordering strategies
//! - Batch result tallies and summary reports
//! - Progress bar and quiet mode
//! - Common logging (tracing) setup
//! - Terminal colors

pub mod batch;
pub mod colors;
pub mod common_utils;
pub mod file_sorter;
pub mod logging;
pub mod progress;
pub mod progress_mode;
pub mod report;

pub use batch::{collect_files, collect_files_sorted, BatchResult};
pub use common_utils::{file_name_lossy, get_extension_lowercase, has_extension};
pub use file_sorter::{natural_cmp, FileSorter, SortStrategy};
pub use progress::{create_progress_bar, format_bytes, format_duration, BatchProgress};
pub use report::{print_simple_summary, print_summary_report, render_summary_report};
