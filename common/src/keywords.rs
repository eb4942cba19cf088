//! 照合キーワード定義
//!
//! 要求タイトルごとに、カタログの指標名に実際に含まれる
//! 少数のキーワードを対応付ける。設定値として明示的に受け渡し、
//! グローバル状態は持たない。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 要求タイトル → キーワード（小文字・重複なし・順序保持）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "HashMap<String, Vec<String>>", into = "HashMap<String, Vec<String>>")]
pub struct KeywordSets {
    entries: HashMap<String, Vec<String>>,
}

impl KeywordSets {
    pub fn new() -> Self {
        Self::default()
    }

    /// キーワードを登録（既存の登録は置き換える）
    pub fn insert<I, S>(&mut self, title: impl Into<String>, keywords: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for keyword in keywords {
            // 前後の空白も部分一致の一部として保持する
            let keyword = keyword.as_ref().to_lowercase();
            if !keyword.is_empty() && !normalized.contains(&keyword) {
                normalized.push(keyword);
            }
        }
        self.entries.insert(title.into(), normalized);
    }

    /// 登録済みのキーワード
    pub fn get(&self, title: &str) -> Option<&[String]> {
        self.entries.get(title).map(|v| v.as_slice())
    }

    /// 照合に使うキーワード（未登録ならタイトル自体を1つだけ使う）
    pub fn resolve(&self, title: &str) -> Vec<String> {
        match self.entries.get(title) {
            Some(keywords) => keywords.clone(),
            None => vec![title.to_lowercase()],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<HashMap<String, Vec<String>>> for KeywordSets {
    fn from(map: HashMap<String, Vec<String>>) -> Self {
        let mut sets = KeywordSets::new();
        for (title, keywords) in map {
            sets.insert(title, keywords);
        }
        sets
    }
}

impl From<KeywordSets> for HashMap<String, Vec<String>> {
    fn from(sets: KeywordSets) -> Self {
        sets.entries
    }
}

/// 照合実行の設定（要求タイトル一覧＋キーワード）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchPlan {
    /// 要求タイトル（出力順）
    #[serde(default)]
    pub requested: Vec<String>,
    /// タイトルごとのキーワード
    #[serde(default)]
    pub keywords: KeywordSets,
}

impl MatchPlan {
    /// JSON文字列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let plan: Self = serde_json::from_str(json)?;
        if plan.requested.is_empty() {
            return Err(Error::Config("requested が空です".into()));
        }
        Ok(plan)
    }

    /// JSONファイルから読み込み
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// 組み込みの照合設定（肝炎・支援技術の16指標）
    pub fn builtin() -> Self {
        let entries: [(&str, &[&str]); 16] = [
            (
                "Hepatitis - new infections",
                &["hepatitis", "incidence", "new infections"],
            ),
            (
                "Hepatitis - number of persons living with chronic hepatitis infection",
                &["hepatitis", "chronic", "living", "prevalence"],
            ),
            (
                "Hepatitis - deaths caused by chronic hepatitis infection",
                &["hepatitis", "mortality", "deaths", "chronic"],
            ),
            (
                "Hepatitis - prevalence of chronic hepatitis among general population",
                &["hepatitis", "prevalence", "chronic"],
            ),
            (
                "Hepatitis - number of chronic hepatitis B-infected persons",
                &["hepatitis b", "chronic", "number", "infected"],
            ),
            (
                "Hepatitis - chronic hepatitis treatment rate among diagnosed",
                &["hepatitis", "treatment", "coverage", "diagnosed"],
            ),
            (
                "Hepatitis - number of persons initiated hepatitis treatment",
                &["hepatitis", "initiated", "treatment", "started"],
            ),
            (
                "Hepatitis B surface antigen (HBsAg)",
                &["hbsag", "hepatitis b surface antigen"],
            ),
            (
                "Hepatitis- diagnosis coverage of chronic hepatitis infection",
                &["hepatitis", "diagnosis", "coverage", "diagnosed"],
            ),
            (
                "Assistive technology education/training, availability",
                &["assistive", "technology", "training", "education"],
            ),
            (
                "Assistive technology workforce availability",
                &["assistive", "technology", "workforce"],
            ),
            (
                "Assistive technology public funding, availability",
                &["assistive", "technology", "public funding"],
            ),
            (
                "Assistive technology government/registered services availability",
                &["assistive", "technology", "services", "government"],
            ),
            (
                "Assistive technology legislation on access to assistive products",
                &["assistive", "products", "legislation", "access"],
            ),
            (
                "Assistive technology need of assistive products met",
                &["assistive", "products", "need", "met"],
            ),
            (
                "Assistive technology use of assistive products",
                &["assistive", "products", "use"],
            ),
        ];

        let mut plan = Self::default();
        for (title, keywords) in entries {
            plan.requested.push(title.to_string());
            plan.keywords.insert(title, keywords.iter().copied());
        }
        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_normalizes_keywords() {
        let mut sets = KeywordSets::new();
        sets.insert("Title", ["Hepatitis", "hepatitis", "", "Incidence", " USE"]);
        assert_eq!(
            sets.get("Title").unwrap(),
            &["hepatitis".to_string(), "incidence".to_string(), " use".to_string()]
        );
    }

    #[test]
    fn test_resolve_fallback() {
        let sets = KeywordSets::new();
        assert_eq!(sets.resolve("Malaria Cases"), vec!["malaria cases".to_string()]);
    }

    #[test]
    fn test_builtin_plan() {
        let plan = MatchPlan::builtin();
        assert_eq!(plan.requested.len(), 16);
        assert_eq!(plan.keywords.len(), 16);
        assert_eq!(
            plan.keywords.resolve("Hepatitis - new infections"),
            vec!["hepatitis", "incidence", "new infections"]
        );
        // 全タイトルにキーワードが登録されている
        for title in &plan.requested {
            assert!(plan.keywords.get(title).is_some(), "{}", title);
        }
    }

    #[test]
    fn test_plan_from_json() {
        let json = r#"{
            "requested": ["Malaria incidence", "Tuberculosis"],
            "keywords": { "Malaria incidence": ["Malaria", "incidence"] }
        }"#;
        let plan = MatchPlan::from_json(json).unwrap();
        assert_eq!(plan.requested, vec!["Malaria incidence", "Tuberculosis"]);
        assert_eq!(plan.keywords.resolve("Malaria incidence"), vec!["malaria", "incidence"]);
        assert_eq!(plan.keywords.resolve("Tuberculosis"), vec!["tuberculosis"]);
    }

    #[test]
    fn test_plan_from_json_empty_requested() {
        let result = MatchPlan::from_json(r#"{"keywords": {}}"#);
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
