//! Batch Processing Module
//!
//! Provides utilities for batch file processing with proper error handling:
//! file collection by extension and a running tally of per-file results.

use crate::file_sorter::{FileSorter, SortStrategy};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Collects regular files under `dir` whose extension (case-insensitive) is in `extensions`.
///
/// With `recursive == false` only the directory's direct children are listed.
/// Symlinks are followed, so a link to an image counts as that image; broken
/// links and other unreadable entries are skipped.
pub fn collect_files(dir: &Path, extensions: &[&str], recursive: bool) -> Vec<PathBuf> {
    let walker = if recursive {
        WalkDir::new(dir).follow_links(true)
    } else {
        WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true)
    };

    walker
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| crate::common_utils::has_extension(e.path(), extensions))
        .map(|e| e.path().to_path_buf())
        .collect()
}

pub fn collect_files_sorted(
    dir: &Path,
    extensions: &[&str],
    recursive: bool,
    sort_strategy: SortStrategy,
) -> Vec<PathBuf> {
    let files = collect_files(dir, extensions, recursive);
    FileSorter::new(sort_strategy).sort(files)
}

#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub errors: Vec<(PathBuf, String)>,
}

impl BatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&mut self, input_bytes: u64, output_bytes: u64) {
        self.total += 1;
        self.succeeded += 1;
        self.input_bytes += input_bytes;
        self.output_bytes += output_bytes;
    }

    pub fn fail(&mut self, path: PathBuf, error: String) {
        self.total += 1;
        self.failed += 1;
        self.errors.push((path, error));
    }

    /// Files that were never attempted (e.g. the run was cancelled).
    pub fn skip_many(&mut self, count: usize) {
        self.total += count;
        self.skipped += count;
    }

    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (self.succeeded as f64 / self.total as f64) * 100.0
        }
    }

    /// Size reduction of successful outputs relative to their inputs, in percent.
    pub fn size_reduction(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            (1.0 - self.output_bytes as f64 / self.input_bytes as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const EXTS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp"];

    #[test]
    fn test_collect_files_filters_by_extension() {
        let temp = TempDir::new().unwrap();
        for name in ["a.jpg", "b.PNG", "c.txt", "d.Webp", "e"] {
            fs::write(temp.path().join(name), b"x").unwrap();
        }

        let mut names: Vec<String> = collect_files(temp.path(), EXTS, false)
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();

        assert_eq!(names, vec!["a.jpg", "b.PNG", "d.Webp"]);
    }

    #[test]
    fn test_collect_files_non_recursive_skips_subdirs() {
        let temp = TempDir::new().unwrap();
        let sub = temp.path().join("nested");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("deep.jpg"), b"x").unwrap();
        fs::create_dir(temp.path().join("folder.jpg")).unwrap();
        fs::write(temp.path().join("top.jpg"), b"x").unwrap();

        let files = collect_files(temp.path(), EXTS, false);
        assert_eq!(files, vec![temp.path().join("top.jpg")]);

        let all = collect_files(temp.path(), EXTS, true);
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_collect_files_sorted_natural() {
        let temp = TempDir::new().unwrap();
        for name in ["p10.jpg", "p9.jpg", "p1.jpg"] {
            fs::write(temp.path().join(name), b"x").unwrap();
        }

        let files = collect_files_sorted(temp.path(), EXTS, false, SortStrategy::NaturalName);
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["p1.jpg", "p9.jpg", "p10.jpg"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_collect_files_follows_symlinked_images() {
        use std::os::unix::fs::symlink;

        let temp = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        fs::write(temp.path().join("plain.png"), b"x").unwrap();
        fs::write(elsewhere.path().join("real.png"), b"x").unwrap();
        fs::create_dir(elsewhere.path().join("album")).unwrap();

        symlink(elsewhere.path().join("real.png"), temp.path().join("link.png")).unwrap();
        symlink(elsewhere.path().join("album"), temp.path().join("album.png")).unwrap();
        symlink(elsewhere.path().join("gone.png"), temp.path().join("dangling.png")).unwrap();

        let files = collect_files_sorted(temp.path(), EXTS, false, SortStrategy::NameAscending);
        assert_eq!(
            files,
            vec![temp.path().join("link.png"), temp.path().join("plain.png")]
        );
    }

    #[test]
    fn test_collect_files_missing_dir_is_empty() {
        let files = collect_files(Path::new("/definitely/not/here"), EXTS, false);
        assert!(files.is_empty());
    }

    #[test]
    fn test_batch_result_new() {
        let result = BatchResult::new();
        assert_eq!(result.total, 0);
        assert_eq!(result.succeeded, 0);
        assert_eq!(result.failed, 0);
        assert_eq!(result.skipped, 0);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_batch_result_mixed() {
        let mut result = BatchResult::new();
        result.success(1000, 400);
        result.success(1000, 600);
        result.fail(PathBuf::from("broken.png"), "Error".to_string());
        result.skip_many(2);

        assert_eq!(result.total, 5);
        assert_eq!(result.succeeded, 2);
        assert_eq!(result.failed, 1);
        assert_eq!(result.skipped, 2);
        assert_eq!(
            result.total,
            result.succeeded + result.failed + result.skipped,
            "STRICT: total must equal succeeded + failed + skipped"
        );
        assert_eq!(result.errors[0].1, "Error");
    }

    #[test]
    fn test_success_rate_empty() {
        let result = BatchResult::new();
        assert!((result.success_rate() - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_success_rate_50_percent() {
        let mut result = BatchResult::new();
        result.success(10, 5);
        result.fail(PathBuf::from("test.png"), "Error".to_string());

        assert!(
            (result.success_rate() - 50.0).abs() < 0.01,
            "1 success, 1 fail should be 50%, got {}",
            result.success_rate()
        );
    }

    #[test]
    fn test_size_reduction() {
        let mut result = BatchResult::new();
        assert_eq!(result.size_reduction(), 0.0);

        result.success(2000, 500);
        assert!((result.size_reduction() - 75.0).abs() < 0.001);
    }
}
