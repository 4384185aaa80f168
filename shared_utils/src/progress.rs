//! Progress Bar Module
//!
//! 统一进度条样式: ████████▓▓░░░░░░
//! - 批量处理进度条（总数 = 待处理文件数）
//! - 进度条存在时日志行通过 `println` 打印，避免撕裂进度条
//! - 字节数与耗时格式化

use crate::progress_mode::is_quiet_mode;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

pub mod progress_style {
    /// indicatif 需要 3 个字符: (filled, current, empty)
    pub const PROGRESS_CHARS: &str = "█▓░";

    /// Spinner 字符序列 - Braille 点阵
    pub const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

    /// 批量处理进度条模板
    pub const BATCH_TEMPLATE: &str = "{spinner:.green} {prefix:.cyan.bold} ▕{bar:35.green/black}▏ {percent:>3}% • {pos}/{len} • ⏱️ {elapsed_precise} (ETA: {eta}) • {msg}";
}

pub fn create_progress_bar(total: u64, prefix: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);

    if is_quiet_mode() {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    } else {
        let style = ProgressStyle::default_bar()
            .template(progress_style::BATCH_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars(progress_style::PROGRESS_CHARS)
            .tick_chars(progress_style::SPINNER_CHARS);
        pb.set_style(style);
        pb.set_prefix(prefix.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
    }
    pb
}

/// Progress bar plus per-outcome counters for a sequential batch.
pub struct BatchProgress {
    pub total: u64,
    pub processed: u64,
    pub succeeded: u64,
    pub failed: u64,
    bar: ProgressBar,
}

impl BatchProgress {
    pub fn new(total: u64, prefix: &str) -> Self {
        Self {
            total,
            processed: 0,
            succeeded: 0,
            failed: 0,
            bar: create_progress_bar(total, prefix),
        }
    }

    pub fn success(&mut self, message: &str) {
        self.processed += 1;
        self.succeeded += 1;
        self.bar.set_message(format!("✅ {}", message));
        self.bar.inc(1);
    }

    pub fn fail(&mut self, message: &str) {
        self.processed += 1;
        self.failed += 1;
        self.bar.set_message(format!("❌ {}", message));
        self.bar.inc(1);
    }

    /// Prints a line above the bar (or plainly when the bar is hidden).
    pub fn println(&self, line: &str) {
        if self.bar.is_hidden() {
            if !is_quiet_mode() {
                eprintln!("{}", line);
            }
        } else {
            self.bar.println(line);
        }
    }

    pub fn finish(&self) {
        self.bar.finish_with_message(format!(
            "Complete: {} succeeded, {} failed",
            self.succeeded, self.failed
        ));
    }

    pub fn abandon(&self, reason: &str) {
        self.bar.abandon_with_message(reason.to_string());
    }

    #[cfg(test)]
    fn bar(&self) -> &ProgressBar {
        &self.bar
    }
}

pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 3600 {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    } else if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{:.1}s", duration.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.00 GB");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(2500)), "2.5s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
        assert_eq!(format_duration(Duration::from_secs(3725)), "1h 2m 5s");
    }

    #[test]
    fn test_batch_progress_counts() {
        let mut progress = BatchProgress::new(3, "test");
        progress.bar().set_draw_target(ProgressDrawTarget::hidden());

        progress.success("a.jpg");
        progress.fail("b.jpg");
        progress.success("c.jpg");
        progress.finish();

        assert_eq!(progress.processed, 3);
        assert_eq!(progress.succeeded, 2);
        assert_eq!(progress.failed, 1);
        assert_eq!(progress.bar().position(), 3);
    }
}
