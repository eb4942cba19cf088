//! 指標名のテキスト正規化

use regex::Regex;

/// 照合用にテキストを正規化する
///
/// 1. 小文字化
/// 2. 英数字・空白以外の連続を1つの空白に置換
/// 3. 連続空白を1つに統一
/// 4. 前後の空白を除去
pub fn normalize(s: &str) -> String {
    lazy_static::lazy_static! {
        static ref SYMBOL_RE: Regex = Regex::new(r"[^a-z0-9\s]+").unwrap();
        static ref SPACE_RE: Regex = Regex::new(r"\s+").unwrap();
    }

    let lowered = s.to_lowercase();
    let replaced = SYMBOL_RE.replace_all(&lowered, " ");
    let collapsed = SPACE_RE.replace_all(&replaced, " ");
    collapsed.trim().to_string()
}

/// `None` は空文字として正規化
pub fn normalize_opt(s: Option<&str>) -> String {
    s.map(normalize).unwrap_or_default()
}
