//! 指標コード照合
//!
//! 要求タイトルに対して、キーワードで絞り込んだカタログの指標を
//! 類似度順に並べ、上位の候補を返す。

use crate::keywords::KeywordSets;
use crate::similarity::score;
use crate::types::{Candidate, IndicatorRecord};
use std::collections::HashSet;

/// 既定の候補数
pub const DEFAULT_TOP_K: usize = 8;

/// 要求タイトルの照合候補を取得
///
/// 1. キーワードを解決（未登録ならタイトル自体）
/// 2. 指標名にいずれかのキーワードを含む指標に絞り込み（大文字小文字無視）
/// 3. (コード, 指標名) で重複除去
/// 4. 要求タイトルとの類似度を計算
/// 5. 類似度の降順に安定ソート（同点はカタログ順）
/// 6. 上位 `top_k` 件に切り詰め
///
/// 絞り込み結果が空なら空のVecを返す。
pub fn find_candidates(
    catalog: &[IndicatorRecord],
    requested: &str,
    keyword_sets: &KeywordSets,
    top_k: usize,
) -> Vec<Candidate> {
    let keywords: Vec<String> = keyword_sets
        .resolve(requested)
        .into_iter()
        .map(|k| k.to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();

    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut candidates: Vec<Candidate> = catalog
        .iter()
        .filter(|record| contains_any(&record.name, &keywords))
        .filter(|record| seen.insert((record.code.as_str(), record.name.as_str())))
        .map(|record| Candidate {
            code: record.code.clone(),
            name: record.name.clone(),
            similarity: score(requested, &record.name),
        })
        .collect();

    // sort_by は安定ソート
    candidates.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    candidates.truncate(top_k);
    candidates
}

/// 指標名がいずれかのキーワードを含むか（大文字小文字無視）
fn contains_any(name: &str, keywords: &[String]) -> bool {
    if name.is_empty() {
        return false;
    }
    let name = name.to_lowercase();
    keywords.iter().any(|k| name.contains(k.as_str()))
}
