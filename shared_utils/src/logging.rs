//! Logging Module - 统一的日志系统
//!
//! 基于 tracing 的日志初始化：
//! - stderr 输出（带颜色）
//! - 日志文件写入日志目录（默认系统临时目录），按天轮转
//! - 旧日志文件清理
//!
//! # Examples
//!
//! ```no_run
//! use shared_utils::logging::{LogConfig, init_logging};
//! use tracing::info;
//!
//! init_logging("img_web", LogConfig::default()).expect("Failed to initialize logging");
//! info!("Program started");
//! ```

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 日志配置结构
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 日志目录路径（默认为系统临时目录）
    pub log_dir: PathBuf,
    /// 保留的最大日志文件数量，默认5个
    pub max_files: usize,
    /// 日志级别，默认Info
    pub level: Level,
    /// 是否同时输出到 stderr
    pub stderr: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: std::env::temp_dir(),
            max_files: 5,
            level: Level::INFO,
            stderr: true,
        }
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_stderr(mut self, enabled: bool) -> Self {
        self.stderr = enabled;
        self
    }
}

/// 初始化日志系统
///
/// 日志文件命名格式：`{program_name}.log.YYYY-MM-DD`。
/// `RUST_LOG` 存在时优先使用，否则只记录 `program_name` 目标下 `config.level` 及以上的事件。
///
/// 只能调用一次：全局 subscriber 已存在时返回错误。
pub fn init_logging(program_name: &str, config: LogConfig) -> Result<()> {
    std::fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("Failed to create log directory: {:?}", config.log_dir))?;

    let log_file_name = format!("{}.log", program_name);
    let file_appender = RollingFileAppender::new(Rotation::DAILY, &config.log_dir, &log_file_name);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(program_name, config.level)));

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_thread_names(true)
        .with_line_number(true);

    let stderr_layer = config.stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false)
            .with_line_number(false)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::debug!(
        program = program_name,
        log_dir = ?config.log_dir,
        log_file = log_file_name,
        max_files = config.max_files,
        level = ?config.level,
        "Logging system initialized"
    );

    cleanup_old_logs(&config.log_dir, program_name, config.max_files)?;

    Ok(())
}

/// Filter directive covering the program target and its library crates.
/// A binary `img-web` logs under `img_web`, so dashes are normalised.
fn default_directive(program_name: &str, level: Level) -> String {
    let target = program_name.replace('-', "_");
    format!("{}={},shared_utils={}", target, level, level)
}

/// 清理旧的日志文件，只保留最近的N个
fn cleanup_old_logs(log_dir: &Path, program_name: &str, max_files: usize) -> Result<()> {
    use std::fs;

    let entries = fs::read_dir(log_dir)
        .with_context(|| format!("Failed to read log directory: {:?}", log_dir))?;

    let mut log_files: Vec<(PathBuf, std::time::SystemTime)> = Vec::new();
    let prefix = format!("{}.log", program_name);

    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let matches = path
            .file_name()
            .map(|n| n.to_string_lossy().starts_with(&prefix))
            .unwrap_or(false);
        if !matches {
            continue;
        }

        if let Ok(modified) = entry.metadata().and_then(|m| m.modified()) {
            log_files.push((path, modified));
        }
    }

    if log_files.len() <= max_files {
        return Ok(());
    }

    // 按修改时间排序（最新的在前）
    log_files.sort_by(|a, b| b.1.cmp(&a.1));

    for (path, _) in log_files.iter().skip(max_files) {
        match fs::remove_file(path) {
            Ok(()) => tracing::debug!(path = ?path, "Removed old log file"),
            Err(e) => tracing::warn!(path = ?path, error = %e, "Failed to remove old log file"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_log_config_default() {
        let config = LogConfig::default();
        assert_eq!(config.max_files, 5);
        assert_eq!(config.level, Level::INFO);
        assert!(config.stderr);
    }

    #[test]
    fn test_log_config_builder() {
        let config = LogConfig::new()
            .with_level(Level::DEBUG)
            .with_stderr(false);

        assert_eq!(config.max_files, 5);
        assert_eq!(config.level, Level::DEBUG);
        assert!(!config.stderr);
    }

    #[test]
    fn test_default_directive_normalises_dashes() {
        assert_eq!(
            default_directive("img-web", Level::DEBUG),
            "img_web=DEBUG,shared_utils=DEBUG"
        );
    }

    #[test]
    fn test_cleanup_old_logs() {
        let temp_dir = TempDir::new().unwrap();
        let program_name = "test_program";

        for i in 0..10 {
            let file_path = temp_dir.path().join(format!("{}.log.2026-01-{:02}", program_name, i + 1));
            fs::write(&file_path, format!("log content {}", i)).unwrap();
            // 确保文件修改时间不同
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        fs::write(temp_dir.path().join("unrelated.txt"), b"keep").unwrap();

        cleanup_old_logs(temp_dir.path(), program_name, 3).unwrap();

        let remaining: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(program_name))
            .collect();

        assert_eq!(remaining.len(), 3);
        assert!(temp_dir.path().join("unrelated.txt").exists());
    }

    #[test]
    fn test_cleanup_under_limit_keeps_everything() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("tool.log"), b"a").unwrap();

        cleanup_old_logs(temp_dir.path(), "tool", 5).unwrap();
        assert!(temp_dir.path().join("tool.log").exists());
    }
}
