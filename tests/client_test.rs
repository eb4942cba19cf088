//! GHO APIクライアントの統合テスト
//!
//! httpmock でページング・エラー分類を検証

use gho_indicators::client::GhoClient;
use gho_indicators::error::GhoError;
use gho_indicators_common::IndicatorRecord;
use httpmock::prelude::*;
use serde_json::json;
use std::time::Duration;

fn client_for(server: &MockServer) -> GhoClient {
    GhoClient::new(&server.url("/api"))
        .expect("クライアント初期化失敗")
        .with_data_timeout(Duration::from_secs(5))
}

/// 2ページのカタログを連結し、重複を除去する
#[test]
fn test_catalog_pagination() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/api/Indicator/page2");
        then.status(200).json_body(json!({
            "value": [
                {"IndicatorCode": "AT_1", "IndicatorName": "Assistive technology workforce"},
                {"IndicatorCode": "HEP_A", "IndicatorName": "Hepatitis A new infections"}
            ]
        }));
    });

    server.mock(|when, then| {
        when.method(GET).path("/api/Indicator");
        then.status(200).json_body(json!({
            "value": [
                {"IndicatorCode": "HEP_A", "IndicatorName": "Hepatitis A new infections"},
                {"IndicatorCode": "HEP_B", "IndicatorName": null}
            ],
            "@data.nextLink": server.url("/api/Indicator/page2")
        }));
    });

    let client = client_for(&server);
    let mut pages_seen = Vec::new();
    let catalog = client
        .load_catalog_with_progress(|page, count| pages_seen.push((page, count)))
        .expect("カタログ取得失敗");

    assert_eq!(
        catalog,
        vec![
            IndicatorRecord::new("HEP_A", "Hepatitis A new infections"),
            IndicatorRecord::new("HEP_B", ""),
            IndicatorRecord::new("AT_1", "Assistive technology workforce"),
        ]
    );
    // 進捗は重複除去前の累計
    assert_eq!(pages_seen, vec![(1, 2), (2, 4)]);
}

/// 単一ページ（次ページリンクなし）
#[test]
fn test_catalog_single_page() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/Indicator");
        then.status(200).json_body(json!({
            "value": [{"IndicatorCode": "X", "IndicatorName": "Example"}]
        }));
    });

    let catalog = client_for(&server).load_catalog().unwrap();
    assert_eq!(catalog.len(), 1);
}

/// 2ページ目の失敗で全体が失敗する
#[test]
fn test_catalog_second_page_failure() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/api/Indicator/page2");
        then.status(503).body("unavailable");
    });

    server.mock(|when, then| {
        when.method(GET).path("/api/Indicator");
        then.status(200).json_body(json!({
            "value": [{"IndicatorCode": "A", "IndicatorName": "Alpha"}],
            "@data.nextLink": server.url("/api/Indicator/page2")
        }));
    });

    let result = client_for(&server).load_catalog();
    match result {
        Err(GhoError::Transport(message)) => assert!(message.contains("503")),
        other => panic!("Transport エラーを期待: {:?}", other),
    }
}

/// value 配列がないレスポンス
#[test]
fn test_catalog_missing_value() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/Indicator");
        then.status(200).json_body(json!({"items": []}));
    });

    let result = client_for(&server).load_catalog();
    assert!(matches!(result, Err(GhoError::Format(_))));
}

/// JSONでないレスポンス
#[test]
fn test_catalog_not_json() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/Indicator");
        then.status(200).body("<html>maintenance</html>");
    });

    let result = client_for(&server).load_catalog();
    assert!(matches!(result, Err(GhoError::Format(_))));
}

/// 次ページリンクが自分自身を指す場合、上限指定があれば停止する
#[test]
fn test_catalog_max_pages_guard() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/Indicator");
        then.status(200).json_body(json!({
            "value": [{"IndicatorCode": "A", "IndicatorName": "Alpha"}],
            "@data.nextLink": server.url("/api/Indicator")
        }));
    });

    let client = client_for(&server).with_max_pages(Some(3));
    let mut pages = 0;
    let result = client.load_catalog_with_progress(|page, _| pages = page);

    assert!(matches!(result, Err(GhoError::Format(_))));
    assert_eq!(pages, 3);
}

/// OData表記の次ページリンクにも対応
#[test]
fn test_catalog_odata_next_link() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/api/Indicator/next");
        then.status(200).json_body(json!({
            "value": [{"IndicatorCode": "B", "IndicatorName": "Beta"}]
        }));
    });

    server.mock(|when, then| {
        when.method(GET).path("/api/Indicator");
        then.status(200).json_body(json!({
            "value": [{"IndicatorCode": "A", "IndicatorName": "Alpha"}],
            "@odata.nextLink": server.url("/api/Indicator/next")
        }));
    });

    let catalog = client_for(&server).load_catalog().unwrap();
    assert_eq!(catalog.len(), 2);
}

/// 接続失敗
#[test]
fn test_connection_failure() {
    let client = GhoClient::new("http://127.0.0.1:1/api").unwrap();
    let result = client.load_catalog();
    assert!(matches!(result, Err(GhoError::Transport(_))));
}

/// 指標データの取得
#[test]
fn test_fetch_observations() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/HEPATITIS_HBV_INFECTIONS_NEW_NUM");
        then.status(200).json_body(json!({
            "value": [
                {"SpatialDim": "JPN", "TimeDim": 2020, "NumericValue": 1200.0, "Dim1": "BTSX"},
                {"SpatialDim": "JPN", "TimeDim": 2021, "NumericValue": 1100.0, "Dim1": "BTSX"}
            ]
        }));
    });

    let table = client_for(&server)
        .fetch_observations("HEPATITIS_HBV_INFECTIONS_NEW_NUM")
        .unwrap();
    assert_eq!(table.len(), 2);
    assert!(table.has_column("Dim1"));
    assert!(table.has_column("NumericValue"));
}

/// 指標データ取得の404
#[test]
fn test_fetch_observations_not_found() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/NO_SUCH_CODE");
        then.status(404);
    });

    let result = client_for(&server).fetch_observations("NO_SUCH_CODE");
    assert!(matches!(result, Err(GhoError::Transport(_))));
}

/// コードから指標を検索
#[test]
fn test_lookup_indicator() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/api/Indicator")
            .query_param_exists("$filter");
        then.status(200).json_body(json!({
            "value": [{"IndicatorCode": "HEP_A", "IndicatorName": "Hepatitis A new infections"}]
        }));
    });

    let client = client_for(&server);
    let found = client.lookup_indicator("HEP_A").unwrap();
    assert_eq!(found, Some(IndicatorRecord::new("HEP_A", "Hepatitis A new infections")));

    let missing = client.lookup_indicator("OTHER").unwrap();
    assert_eq!(missing, None);
}

/// 検索結果のレコードが不正なら「該当なし」ではなく形式エラー
#[test]
fn test_lookup_indicator_malformed_record() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/Indicator");
        then.status(200).json_body(json!({
            "value": [{"IndicatorName": "no code field"}]
        }));
    });

    let result = client_for(&server).lookup_indicator("HEP_A");
    assert!(matches!(result, Err(GhoError::Format(_))), "{:?}", result);
}

/// 記号を含むコードもクエリを壊さずに送信される
#[test]
fn test_lookup_indicator_escapes_code() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/Indicator")
            .query_param("$filter", "IndicatorCode eq 'A&B ''C'''");
        then.status(200).json_body(json!({
            "value": [{"IndicatorCode": "A&B 'C'", "IndicatorName": "Quoted"}]
        }));
    });

    let found = client_for(&server).lookup_indicator("A&B 'C'").unwrap();
    mock.assert();
    assert_eq!(found, Some(IndicatorRecord::new("A&B 'C'", "Quoted")));
}
