//! Report Module
//!
//! Provides summary reporting functionality for batch operations

use crate::batch::BatchResult;
use crate::progress::{format_bytes, format_duration};
use std::path::Path;
use std::time::Duration;

/// Renders the boxed summary for a finished batch.
pub fn render_summary_report(
    result: &BatchResult,
    duration: Duration,
    output_dir: &Path,
    operation_name: &str,
) -> String {
    let mut lines = Vec::new();
    let rule = "═".repeat(64);

    lines.push(format!("╔{}╗", rule));
    lines.push(format!("║  📊 {} Summary Report", operation_name));
    lines.push(format!("╠{}╣", rule));
    lines.push(format!("║  📁 Files Found:        {:>10}", result.total));
    lines.push(format!("║  ✅ Succeeded:          {:>10}", result.succeeded));
    lines.push(format!("║  ❌ Failed:             {:>10}", result.failed));
    if result.skipped > 0 {
        lines.push(format!("║  ⏭️  Not attempted:      {:>10}", result.skipped));
    }
    lines.push(format!("║  📈 Success Rate:       {:>9.1}%", result.success_rate()));
    lines.push(format!("╠{}╣", rule));
    lines.push(format!("║  💾 Input Size:         {:>10}", format_bytes(result.input_bytes)));
    lines.push(format!("║  💾 Output Size:        {:>10}", format_bytes(result.output_bytes)));
    lines.push(format!("║  📉 Size Reduction:     {:>9.1}%", result.size_reduction()));
    lines.push(format!("╠{}╣", rule));
    lines.push(format!("║  ⏱️  Total Time:         {:>10}", format_duration(duration)));
    lines.push(format!("║  📂 Output: {}", output_dir.display()));
    lines.push(format!("╚{}╝", rule));

    if !result.errors.is_empty() {
        lines.push(String::new());
        lines.push("❌ Errors encountered:".to_string());
        lines.push("━".repeat(66));
        for (path, error) in &result.errors {
            lines.push(format!("   {} → {}", path.display(), error));
        }
    }

    lines.join("\n")
}

pub fn print_summary_report(
    result: &BatchResult,
    duration: Duration,
    output_dir: &Path,
    operation_name: &str,
) {
    println!();
    println!(
        "{}",
        render_summary_report(result, duration, output_dir, operation_name)
    );
}

pub fn print_simple_summary(result: &BatchResult) {
    println!(
        "\n✅ Complete: {} succeeded, {} failed (total: {})",
        result.succeeded, result.failed, result.total
    );
}
