//! 照合レポートの組み立て

use crate::keywords::KeywordSets;
use crate::matcher::{find_candidates, DEFAULT_TOP_K};
use crate::types::{IndicatorRecord, MatchReportRow};

/// 照合レポートを作成（候補数は既定の8件）
pub fn build_report(
    requested: &[String],
    catalog: &[IndicatorRecord],
    keyword_sets: &KeywordSets,
) -> Vec<MatchReportRow> {
    build_report_with_top_k(requested, catalog, keyword_sets, DEFAULT_TOP_K)
}

/// 照合レポートを作成
///
/// 要求タイトルの入力順、その中では順位順に並ぶ。
/// 候補がないタイトルは `NO MATCH FOUND` の1行のみ。
pub fn build_report_with_top_k(
    requested: &[String],
    catalog: &[IndicatorRecord],
    keyword_sets: &KeywordSets,
    top_k: usize,
) -> Vec<MatchReportRow> {
    let mut rows = Vec::new();

    for title in requested {
        let candidates = find_candidates(catalog, title, keyword_sets, top_k);

        if candidates.is_empty() {
            rows.push(MatchReportRow::no_match(title));
            continue;
        }

        for (index, candidate) in candidates.into_iter().enumerate() {
            rows.push(MatchReportRow {
                requested_indicator: title.clone(),
                rank: Some(index + 1),
                indicator_code: candidate.code,
                indicator_name: candidate.name,
                similarity: Some(round3(candidate.similarity)),
            });
        }
    }

    rows
}

/// 小数第3位に丸める
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NO_MATCH_FOUND;

    fn catalog() -> Vec<IndicatorRecord> {
        vec![
            IndicatorRecord::new("HEP_A", "Hepatitis A new infections"),
            IndicatorRecord::new("HEP_B", "Hepatitis B incidence"),
            IndicatorRecord::new("AT_1", "Assistive technology workforce"),
        ]
    }

    #[test]
    fn test_build_report_groups() {
        let requested = vec![
            "Hepatitis - new infections".to_string(),
            "Malaria deaths".to_string(),
            "Assistive technology workforce availability".to_string(),
        ];
        let mut sets = KeywordSets::new();
        sets.insert(
            "Hepatitis - new infections",
            ["hepatitis", "incidence", "new infections"],
        );
        sets.insert(
            "Assistive technology workforce availability",
            ["assistive", "technology", "workforce"],
        );

        let rows = build_report(&requested, &catalog(), &sets);
        assert_eq!(rows.len(), 4);

        // 入力順 → 順位順
        assert_eq!(rows[0].requested_indicator, "Hepatitis - new infections");
        assert_eq!(rows[0].rank, Some(1));
        assert_eq!(rows[1].requested_indicator, "Hepatitis - new infections");
        assert_eq!(rows[1].rank, Some(2));
        assert!(rows[0].similarity >= rows[1].similarity);

        assert_eq!(rows[2].requested_indicator, "Malaria deaths");
        assert!(rows[2].is_no_match());
        assert_eq!(rows[2].indicator_name, NO_MATCH_FOUND);
        assert_eq!(rows[2].similarity, None);

        assert_eq!(rows[3].indicator_code, "AT_1");
        assert_eq!(rows[3].rank, Some(1));
    }

    #[test]
    fn test_build_report_ranks_contiguous() {
        let requested = vec!["Hepatitis".to_string()];
        let rows = build_report(&requested, &catalog(), &KeywordSets::new());
        let ranks: Vec<usize> = rows.iter().filter_map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2]);
    }

    #[test]
    fn test_build_report_similarity_rounded() {
        let requested = vec!["Hepatitis".to_string()];
        let rows = build_report(&requested, &catalog(), &KeywordSets::new());
        for row in rows {
            let s = row.similarity.unwrap();
            assert!(((s * 1000.0).round() - s * 1000.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_build_report_empty_catalog() {
        let requested = vec!["A".to_string(), "B".to_string()];
        let rows = build_report(&requested, &[], &KeywordSets::new());
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.is_no_match()));
    }

    #[test]
    fn test_round3() {
        assert_eq!(round3(0.84615), 0.846);
        assert_eq!(round3(1.0), 1.0);
        assert_eq!(round3(0.0), 0.0);
    }
}
