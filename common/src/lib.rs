//! GHO Indicators Common Library
//!
//! 指標コード照合とデータ整形のネットワーク非依存な部分

pub mod types;
pub mod error;
pub mod text;
pub mod similarity;
pub mod keywords;
pub mod matcher;
pub mod report;
pub mod reshape;

pub use types::{Candidate, IndicatorRecord, LongTable, MatchReportRow, WideTable, NO_MATCH_FOUND};
pub use error::{Error, Result};
pub use text::normalize;
pub use similarity::score;
pub use keywords::{KeywordSets, MatchPlan};
pub use matcher::{find_candidates, DEFAULT_TOP_K};
pub use report::{build_report, build_report_with_top_k};
pub use reshape::{pivot_wide, to_long, ObservationTable};
