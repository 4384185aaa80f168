//! 终端颜色支持模块
//!
//! 提供统一的彩色输出

use console::{style, Style};

/// 成功颜色（绿色）
pub fn success() -> Style {
    Style::new().green().bold()
}

/// 错误颜色（红色）
pub fn error() -> Style {
    Style::new().red().bold()
}

/// 警告颜色（黄色）
pub fn warning() -> Style {
    Style::new().yellow()
}

/// 信息颜色（青色）
pub fn info() -> Style {
    Style::new().cyan()
}

/// 暗淡颜色（灰色）
pub fn dim() -> Style {
    Style::new().dim()
}

/// 格式化大小变化百分比（负数 = 变小）
pub fn fmt_size_pct(pct: f64) -> String {
    if pct < 0.0 {
        format!("{}", style(format!("{:+.1}%", pct)).green().bold())
    } else if pct < 5.0 {
        format!("{}", style(format!("{:+.1}%", pct)).yellow())
    } else {
        format!("{}", style(format!("{:+.1}%", pct)).red())
    }
}

/// Percentage change from `input` to `output` bytes; 0 when `input` is 0.
pub fn size_change_pct(input: u64, output: u64) -> f64 {
    if input == 0 {
        0.0
    } else {
        (output as f64 / input as f64 - 1.0) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_change_pct() {
        assert_eq!(size_change_pct(0, 100), 0.0);
        assert!((size_change_pct(1000, 250) + 75.0).abs() < 1e-9);
        assert!((size_change_pct(100, 150) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_fmt_size_pct_contains_value() {
        console::set_colors_enabled(false);
        assert_eq!(fmt_size_pct(-12.345), "-12.3%");
        assert_eq!(fmt_size_pct(3.0), "+3.0%");
    }
}
