//! Common Utilities Module
//!
//! 路径与文件名相关的小工具函数，供批处理和 CLI 共用。

use std::path::Path;

/// 获取文件扩展名（小写）
///
/// # Examples
/// ```
/// use std::path::Path;
/// use shared_utils::common_utils::get_extension_lowercase;
///
/// assert_eq!(get_extension_lowercase(Path::new("photo.JPG")), "jpg");
/// assert_eq!(get_extension_lowercase(Path::new("README")), "");
/// ```
pub fn get_extension_lowercase(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}

/// 检查文件扩展名是否在给定列表中（大小写不敏感）
///
/// # Examples
/// ```
/// use std::path::Path;
/// use shared_utils::common_utils::has_extension;
///
/// let extensions = &["jpg", "png", "webp"];
/// assert!(has_extension(Path::new("photo.JPG"), extensions));
/// assert!(has_extension(Path::new("image.png"), extensions));
/// assert!(!has_extension(Path::new("notes.txt"), extensions));
/// ```
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    let ext = get_extension_lowercase(path);
    !ext.is_empty() && extensions.contains(&ext.as_str())
}

/// File name for display; falls back to the full path when there is none.
pub fn file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
