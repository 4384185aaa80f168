//! File Sorting Module
//!
//! 目录列举的顺序由文件系统决定，不保证有序；批量重命名需要可预测的顺序，
//! 因此在这里提供几种排序策略。

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortStrategy {
    /// Keep whatever order the directory listing returned.
    None,
    /// Plain byte order of the file name.
    NameAscending,
    /// Digit runs compare numerically: `IMG_2.jpg` < `IMG_10.jpg`.
    #[default]
    NaturalName,
}

pub struct FileSorter {
    strategy: SortStrategy,
}

impl FileSorter {
    pub fn new(strategy: SortStrategy) -> Self {
        Self { strategy }
    }

    pub fn sort(&self, mut files: Vec<PathBuf>) -> Vec<PathBuf> {
        match self.strategy {
            SortStrategy::None => {}
            SortStrategy::NameAscending => files.sort_by(|a, b| file_name_of(a).cmp(&file_name_of(b))),
            SortStrategy::NaturalName => files.sort_by(|a, b| {
                let (a, b) = (file_name_of(a), file_name_of(b));
                natural_cmp(&a, &b).then_with(|| a.cmp(&b))
            }),
        }
        files
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Natural ordering of two names. Text segments compare case-insensitively,
/// digit runs compare by numeric value (leading zeros ignored, then shorter run first).
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a_chars = a.chars().peekable();
    let mut b_chars = b.chars().peekable();

    loop {
        match (a_chars.peek().copied(), b_chars.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) if ca.is_ascii_digit() && cb.is_ascii_digit() => {
                let run_a = take_digits(&mut a_chars);
                let run_b = take_digits(&mut b_chars);
                let ord = compare_digit_runs(&run_a, &run_b);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(ca), Some(cb)) => {
                let ord = ca.to_lowercase().cmp(cb.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                a_chars.next();
                b_chars.next();
            }
        }
    }
}

fn take_digits<I: Iterator<Item = char>>(chars: &mut std::iter::Peekable<I>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a_trimmed = a.trim_start_matches('0');
    let b_trimmed = b.trim_start_matches('0');
    a_trimmed
        .len()
        .cmp(&b_trimmed.len())
        .then_with(|| a_trimmed.cmp(b_trimmed))
        .then_with(|| a.len().cmp(&b.len()))
}
