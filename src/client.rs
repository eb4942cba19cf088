//! GHO OData APIクライアント
//!
//! 同期・単一スレッドで1リクエストずつ実行する。リトライはしない。
//! どのページの失敗でも、それまでに取得したデータは破棄して `Err` を返す。

use crate::config::Config;
use crate::error::{GhoError, Result};
use gho_indicators_common::{IndicatorRecord, ObservationTable};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::time::Duration;

const USER_AGENT: &str = concat!("gho-indicators/", env!("CARGO_PKG_VERSION"));

/// 次ページリンクのフィールド名（優先順）
const NEXT_LINK_FIELDS: [&str; 2] = ["@data.nextLink", "@odata.nextLink"];

pub struct GhoClient {
    http: reqwest::blocking::Client,
    base_url: String,
    data_timeout: Duration,
    max_pages: Option<usize>,
}

impl GhoClient {
    pub fn new(base_url: &str) -> Result<Self> {
        // カタログ取得はタイムアウトなし。指標データはリクエスト単位で設定する
        let http = reqwest::blocking::Client::builder()
            .timeout(None::<Duration>)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GhoError::Transport(format!("HTTPクライアント初期化失敗: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            data_timeout: Duration::from_secs(60),
            max_pages: None,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(&config.base_url)?
            .with_data_timeout(Duration::from_secs(config.timeout_seconds))
            .with_max_pages(config.max_catalog_pages))
    }

    pub fn with_data_timeout(mut self, timeout: Duration) -> Self {
        self.data_timeout = timeout;
        self
    }

    /// カタログ取得の最大ページ数（None: 次ページリンクがなくなるまで）
    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn catalog_url(&self) -> String {
        format!("{}/Indicator", self.base_url)
    }

    /// 指標カタログを全ページ取得
    pub fn load_catalog(&self) -> Result<Vec<IndicatorRecord>> {
        self.load_catalog_with_progress(|_, _| {})
    }

    /// 指標カタログを全ページ取得（ページごとに `on_page(ページ番号, 累計件数)` を呼ぶ）
    ///
    /// `(コード, 指標名)` が重複するレコードは最初の1件のみ残す。
    pub fn load_catalog_with_progress(
        &self,
        mut on_page: impl FnMut(usize, usize),
    ) -> Result<Vec<IndicatorRecord>> {
        let mut records: Vec<IndicatorRecord> = Vec::new();
        let mut next = Some(self.catalog_url());
        let mut pages = 0usize;

        while let Some(url) = next {
            if let Some(max) = self.max_pages {
                if pages >= max {
                    return Err(GhoError::Format(format!(
                        "カタログのページ数が上限({})を超えました: {}",
                        max, url
                    )));
                }
            }

            let payload = self.get_json(&url, None)?;
            next = next_link(&payload);

            for item in value_array(payload, &url)? {
                let record: IndicatorRecord = serde_json::from_value(Value::Object(item))
                    .map_err(|e| GhoError::Format(format!("指標レコードが不正: {} ({})", e, url)))?;
                records.push(record);
            }

            pages += 1;
            on_page(pages, records.len());
        }

        Ok(dedup_records(records))
    }

    /// 指標データを取得
    pub fn fetch_observations(&self, code: &str) -> Result<ObservationTable> {
        let url = format!("{}/{}", self.base_url, code);
        let payload = self.get_json(&url, Some(self.data_timeout))?;
        let items = value_array(payload, &url)?;
        Ok(ObservationTable::from_records(items)?)
    }

    /// コードから指標レコードを1件取得
    ///
    /// 不正なレコードは「該当なし」ではなく `Format` エラーとする。
    pub fn lookup_indicator(&self, code: &str) -> Result<Option<IndicatorRecord>> {
        let url = reqwest::Url::parse_with_params(
            &self.catalog_url(),
            &[("$filter", odata_code_filter(code))],
        )
        .map_err(|e| GhoError::Config(format!("URLが不正です: {} ({})", e, self.base_url)))?;
        let url = url.as_str();
        let payload = self.get_json(url, Some(self.data_timeout))?;

        let records = value_array(payload, url)?
            .into_iter()
            .map(|item| {
                serde_json::from_value::<IndicatorRecord>(Value::Object(item))
                    .map_err(|e| GhoError::Format(format!("指標レコードが不正: {} ({})", e, url)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(records.into_iter().find(|r| r.code == code))
    }

    fn get_json(&self, url: &str, timeout: Option<Duration>) -> Result<Value> {
        let mut request = self.http.get(url);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .map_err(|e| GhoError::Transport(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GhoError::Transport(format!("HTTP {} ({})", status.as_u16(), url)));
        }

        let text = response
            .text()
            .map_err(|e| GhoError::Transport(format!("レスポンス読み込み失敗: {} ({})", e, url)))?;

        serde_json::from_str(text.trim_start_matches('\u{feff}')).map_err(|e| {
            GhoError::Format(format!(
                "JSONではありません: {} (body: {})",
                e,
                text.chars().take(200).collect::<String>()
            ))
        })
    }
}

/// レスポンスの `value` 配列を取り出す
fn value_array(payload: Value, url: &str) -> Result<Vec<Map<String, Value>>> {
    let Value::Object(mut object) = payload else {
        return Err(GhoError::Format(format!("レスポンスがオブジェクトではありません ({})", url)));
    };

    match object.remove("value") {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(map) => Ok(map),
                other => Err(GhoError::Format(format!(
                    "value の要素がオブジェクトではありません: {} ({})",
                    other, url
                ))),
            })
            .collect(),
        _ => Err(GhoError::Format(format!("value 配列がありません ({})", url))),
    }
}

/// `IndicatorCode eq '<code>'`（シングルクォートは OData の規則で二重化）
fn odata_code_filter(code: &str) -> String {
    format!("IndicatorCode eq '{}'", code.replace('\'', "''"))
}

/// 次ページのURL（なければNone）
fn next_link(payload: &Value) -> Option<String> {
    NEXT_LINK_FIELDS
        .iter()
        .filter_map(|field| payload.get(field).and_then(|v| v.as_str()))
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// `(コード, 指標名)` の重複を除去（順序は保持）
pub fn dedup_records(records: Vec<IndicatorRecord>) -> Vec<IndicatorRecord> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    records
        .into_iter()
        .filter(|r| seen.insert((r.code.clone(), r.name.clone())))
        .collect()
}
