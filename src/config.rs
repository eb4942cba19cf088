use crate::error::{GhoError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://ghoapi.azureedge.net/api";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GHO OData APIのベースURL
    pub base_url: String,
    /// 指標データ取得のタイムアウト（カタログ取得には適用しない）
    pub timeout_seconds: u64,
    /// 照合候補数
    pub top_k: usize,
    /// カタログ取得の最大ページ数（None: 無制限）
    pub max_catalog_pages: Option<usize>,
    /// 指標データの出力先
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout_seconds: 60,
            top_k: gho_indicators_common::DEFAULT_TOP_K,
            max_catalog_pages: None,
            output_dir: PathBuf::from("output"),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| GhoError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("gho-indicators").join("config.json"))
    }

    pub fn set_base_url(&mut self, url: String) -> Result<()> {
        let url = url.trim().trim_end_matches('/').to_string();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(GhoError::Config(format!("URLが不正です: {}", url)));
        }
        self.base_url = url;
        self.save()
    }
}
