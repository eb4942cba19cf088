//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    /// 期待した列・フィールドがレスポンスに存在しない
    #[error("Format error: {0}")]
    Format(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = Error::Io(io_error);
        let display = format!("{}", error);
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
    }

    #[test]
    fn test_error_display_format() {
        let error = Error::Format("Missing columns [\"TimeDim\"]".to_string());
        let display = format!("{}", error);
        assert!(display.starts_with("Format error"));
        assert!(display.contains("TimeDim"));
    }

    #[test]
    fn test_error_display_config() {
        let error = Error::Config("キーワードファイルが不正です".to_string());
        let display = format!("{}", error);
        assert_eq!(display, "Config error: キーワードファイルが不正です");
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }
}
