use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// 照合レポートの既定の出力先
pub const DEFAULT_MATCH_OUTPUT: &str = "indicator_code_matches.csv";

#[derive(Parser)]
#[command(name = "gho-indicators")]
#[command(about = "WHO GHO指標コード照合・データ取得ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 要求タイトルを指標コードに照合してCSVを出力
    Match {
        /// 照合設定JSON（requested / keywords）。省略時は組み込み設定
        #[arg(short, long)]
        plan: Option<PathBuf>,

        /// 出力CSVファイル
        #[arg(short, long, default_value = DEFAULT_MATCH_OUTPUT)]
        output: PathBuf,

        /// タイトルごとの候補数（省略時は設定値）
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// カタログ取得の最大ページ数（省略時は無制限）
        #[arg(long)]
        max_pages: Option<usize>,
    },

    /// 指標データを取得してlong/wide形式で保存
    Export {
        /// 指標コード（複数指定可）
        #[arg(required = true)]
        codes: Vec<String>,

        /// 出力ディレクトリ（省略時は設定値）
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// 出力ファイル名の接頭辞（コード1件のときのみ。省略時はコード）
        #[arg(short, long)]
        stem: Option<String>,

        /// 出力形式 (csv/excel/both)
        #[arg(short, long, default_value = "csv")]
        format: ExportFormat,

        /// SpatialDim/TimeDim/NumericValue 列が揃っていなければエラー
        #[arg(long)]
        strict: bool,

        /// コードごとにサブディレクトリを作成
        #[arg(long)]
        per_code_dir: bool,
    },

    /// 指標カタログをCSVに出力
    Catalog {
        /// 出力CSVファイル
        #[arg(short, long, default_value = "indicator_catalog.csv")]
        output: PathBuf,

        /// カタログ取得の最大ページ数（省略時は無制限）
        #[arg(long)]
        max_pages: Option<usize>,
    },

    /// 指標コードの情報を表示
    Info {
        /// 指標コード
        #[arg(required = true)]
        code: String,
    },

    /// 設定を表示/編集
    Config {
        /// APIのベースURLを設定
        #[arg(long)]
        set_base_url: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Csv,
    Excel,
    Both,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "both" => Ok(ExportFormat::Both),
            _ => Err(format!("Unknown format: {}. Use csv, excel, or both", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Excel => write!(f, "excel"),
            ExportFormat::Both => write!(f, "both"),
        }
    }
}
