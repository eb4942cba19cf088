use thiserror::Error;

#[derive(Error, Debug)]
pub enum GhoError {
    #[error("設定エラー: {0}")]
    Config(String),

    /// 接続失敗・2xx以外のステータス
    #[error("通信エラー: {0}")]
    Transport(String),

    /// レスポンスに期待したフィールド・列がない
    #[error("データ形式エラー: {0}")]
    Format(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV出力エラー: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error(transparent)]
    Common(gho_indicators_common::Error),
}

impl From<gho_indicators_common::Error> for GhoError {
    fn from(err: gho_indicators_common::Error) -> Self {
        // 共通ライブラリの形式エラーはそのまま形式エラーとして扱う
        match err {
            gho_indicators_common::Error::Format(message) => GhoError::Format(message),
            other => GhoError::Common(other),
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for GhoError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        GhoError::ExcelGeneration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GhoError>;
