//! Job configuration

use crate::error::BatchError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use shared_utils::SortStrategy;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Folder created inside the source directory to receive the converted images.
pub const OUTPUT_DIR_NAME: &str = "listas_para_web";

/// Accepted input extensions (compared case-insensitively).
pub const INPUT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp"];

pub const DEFAULT_MAX_WIDTH: u32 = 1080;
pub const DEFAULT_QUALITY: u8 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Webp,
    Jpeg,
    Png,
}

impl OutputFormat {
    /// File extension of the written files. It is the format name itself, so JPEG uses `.jpeg`.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Webp => "webp",
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "webp" => Ok(OutputFormat::Webp),
            "jpeg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            other => Err(format!(
                "unsupported output format '{}' (expected webp, jpeg or png)",
                other
            )),
        }
    }
}

/// Order in which matched files are processed, and therefore numbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileOrder {
    /// Natural file-name order: `IMG_2.jpg` before `IMG_10.jpg`.
    #[default]
    Name,
    /// Plain byte order of the file name.
    Lexical,
    /// Raw directory listing order, as returned by the filesystem.
    #[value(name = "filesystem")]
    FileSystem,
}

impl From<FileOrder> for SortStrategy {
    fn from(order: FileOrder) -> Self {
        match order {
            FileOrder::Name => SortStrategy::NaturalName,
            FileOrder::Lexical => SortStrategy::NameAscending,
            FileOrder::FileSystem => SortStrategy::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchJobConfig {
    pub source_dir: PathBuf,
    pub base_name: String,
    pub output_format: OutputFormat,
    pub max_width: u32,
    pub quality: u8,
    pub order: FileOrder,
}

impl BatchJobConfig {
    pub fn new(source_dir: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
        Self {
            source_dir: source_dir.into(),
            base_name: base_name.into(),
            output_format: OutputFormat::default(),
            max_width: DEFAULT_MAX_WIDTH,
            quality: DEFAULT_QUALITY,
            order: FileOrder::default(),
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn with_max_width(mut self, max_width: u32) -> Self {
        self.max_width = max_width;
        self
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_order(mut self, order: FileOrder) -> Self {
        self.order = order;
        self
    }

    /// Base name with surrounding whitespace removed; this is the stem actually used.
    pub fn stem(&self) -> &str {
        self.base_name.trim()
    }

    pub fn output_dir(&self) -> PathBuf {
        self.source_dir.join(OUTPUT_DIR_NAME)
    }

    /// `{stem}{n}.{ext}`
    pub fn output_file_name(&self, n: u32) -> String {
        format!("{}{}.{}", self.stem(), n, self.output_format.extension())
    }

    /// Checks every precondition before anything is written. The source folder
    /// must also be listable, so a permission problem is not mistaken for an
    /// empty folder later on.
    pub fn validate(&self) -> Result<(), BatchError> {
        if self.source_dir.as_os_str().is_empty() || !self.source_dir.is_dir() {
            return Err(BatchError::config("no folder selected"));
        }
        if self.stem().is_empty() {
            return Err(BatchError::config("missing base name"));
        }
        if self.max_width == 0 {
            return Err(BatchError::config("max width must be positive"));
        }
        if !(1..=100).contains(&self.quality) {
            return Err(BatchError::config("quality must be between 1 and 100"));
        }
        std::fs::read_dir(&self.source_dir).map_err(|source| BatchError::SourceDir {
            path: self.source_dir.clone(),
            source,
        })?;
        Ok(())
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = BatchJobConfig::new("/photos", "trip");
        assert_eq!(config.output_format, OutputFormat::Webp);
        assert_eq!(config.max_width, 1080);
        assert_eq!(config.quality, 80);
        assert_eq!(config.order, FileOrder::Name);
    }

    #[test]
    fn test_output_dir_is_inside_source() {
        let config = BatchJobConfig::new("/photos/summer", "trip");
        assert_eq!(
            config.output_dir(),
            PathBuf::from("/photos/summer/listas_para_web")
        );
    }

    #[test]
    fn test_output_file_name_uses_trimmed_stem() {
        let config = BatchJobConfig::new("/p", "  comida ").with_format(OutputFormat::Jpeg);
        assert_eq!(config.output_file_name(1), "comida1.jpeg");
        assert_eq!(config.output_file_name(12), "comida12.jpeg");
    }

    #[test]
    fn test_format_parse_and_display() {
        assert_eq!("WEBP".parse::<OutputFormat>().unwrap(), OutputFormat::Webp);
        assert_eq!("png".parse::<OutputFormat>().unwrap(), OutputFormat::Png);
        assert!("jpg".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Jpeg.to_string(), "jpeg");
    }

    #[test]
    fn test_validate_missing_folder() {
        let err = BatchJobConfig::new("", "trip").validate().unwrap_err();
        assert!(matches!(err, BatchError::Config(ref m) if m == "no folder selected"));

        let err = BatchJobConfig::new("/no/such/folder/anywhere", "trip")
            .validate()
            .unwrap_err();
        assert!(matches!(err, BatchError::Config(ref m) if m == "no folder selected"));
    }

    #[test]
    fn test_validate_blank_base_name() {
        let temp = TempDir::new().unwrap();
        let err = BatchJobConfig::new(temp.path(), "   ").validate().unwrap_err();
        assert!(matches!(err, BatchError::Config(ref m) if m == "missing base name"));
    }

    #[test]
    fn test_validate_folder_checked_before_name() {
        let err = BatchJobConfig::new("", "").validate().unwrap_err();
        assert!(matches!(err, BatchError::Config(ref m) if m == "no folder selected"));
    }

    #[test]
    fn test_validate_ranges() {
        let temp = TempDir::new().unwrap();
        let base = BatchJobConfig::new(temp.path(), "trip");

        assert!(base.clone().validate().is_ok());
        assert!(base.clone().with_max_width(0).validate().is_err());
        assert!(base.clone().with_quality(0).validate().is_err());
        assert!(base.clone().with_quality(101).validate().is_err());
        assert!(base.clone().with_quality(1).validate().is_ok());
        assert!(base.with_quality(100).validate().is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_validate_unreadable_folder() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let locked = temp.path().join("locked");
        std::fs::create_dir(&locked).unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

        // root ignores directory permissions; nothing to check then
        let readable = std::fs::read_dir(&locked).is_ok();
        let result = BatchJobConfig::new(&locked, "trip").validate();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

        if !readable {
            assert!(matches!(result, Err(BatchError::SourceDir { ref path, .. }) if *path == locked));
        }
    }

    #[test]
    fn test_file_order_maps_to_sort_strategy() {
        assert_eq!(SortStrategy::from(FileOrder::Name), SortStrategy::NaturalName);
        assert_eq!(SortStrategy::from(FileOrder::Lexical), SortStrategy::NameAscending);
        assert_eq!(SortStrategy::from(FileOrder::FileSystem), SortStrategy::None);
    }
}
