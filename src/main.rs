use anyhow::{bail, Context};
use clap::Parser;
use gho_indicators::{cli, client, config, export};
use gho_indicators_common::{build_report_with_top_k, reshape, to_long, IndicatorRecord, MatchPlan, MatchReportRow};
use cli::{Cli, Commands};
use client::GhoClient;
use config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// 照合結果として画面に表示する行数
const REPORT_PREVIEW_ROWS: usize = 30;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Match { plan, output, top_k, max_pages } => {
            println!("🔎 gho-indicators - 指標コード照合\n");

            let plan = match plan {
                Some(path) => MatchPlan::from_file(&path)
                    .with_context(|| format!("照合設定の読み込みに失敗: {}", path.display()))?,
                None => MatchPlan::builtin(),
            };
            let top_k = top_k.unwrap_or(config.top_k);

            // 1. カタログ取得
            println!("[1/3] 指標カタログを取得中...");
            let client = GhoClient::from_config(&config)?
                .with_max_pages(max_pages.or(config.max_catalog_pages));
            let catalog = load_catalog_with_spinner(&client, cli.verbose)?;
            println!("✔ {}件の指標を取得\n", catalog.len());

            // 2. 照合
            println!("[2/3] {}件のタイトルを照合中...", plan.requested.len());
            let rows = build_report_with_top_k(&plan.requested, &catalog, &plan.keywords, top_k);
            let no_match = rows.iter().filter(|r| r.is_no_match()).count();
            if no_match > 0 {
                eprintln!("⚠ 候補なし: {}件", no_match);
            }
            println!("✔ 照合完了\n");

            // 3. 結果保存
            println!("[3/3] 結果を保存中...");
            export::csv::write_match_report(&rows, &output)
                .with_context(|| format!("照合結果の保存に失敗: {}", output.display()))?;
            println!("✔ 結果を保存: {}\n", output.display());

            print_report_preview(&rows, REPORT_PREVIEW_ROWS);
        }

        Commands::Export { codes, out_dir, stem, format, strict, per_code_dir } => {
            println!("📄 gho-indicators - 指標データ出力\n");

            if stem.is_some() && codes.len() > 1 {
                bail!("--stem は指標コードが1件のときのみ指定できます");
            }

            let out_dir = out_dir.unwrap_or_else(|| config.output_dir.clone());
            let client = GhoClient::from_config(&config)?;
            let total = codes.len();

            for (index, code) in codes.iter().enumerate() {
                println!("[{}/{}] {} を取得中...", index + 1, total, code);
                let table = client.fetch_observations(code)?;
                if cli.verbose {
                    println!("  {}行 / 列: {:?}", table.len(), table.columns);
                }

                if strict {
                    table.require_columns(&reshape::STRICT_COLUMNS)?;
                }
                let long = to_long(&table)?;
                println!("✔ {}行を整形", long.len());

                let dir = if per_code_dir { out_dir.join(code) } else { out_dir.clone() };
                let file_stem = stem.as_deref().unwrap_or(code);

                println!("- 出力中... (形式: {})", format);
                let written = export::export_indicator(&long, &dir, file_stem, &format)
                    .with_context(|| format!("{} の出力に失敗: {}", code, dir.display()))?;
                for path in written {
                    println!("✔ 保存: {}", path.display());
                }
                println!();
            }

            println!("✅ 出力完了");
        }

        Commands::Catalog { output, max_pages } => {
            println!("📚 gho-indicators - 指標カタログ\n");

            let client = GhoClient::from_config(&config)?
                .with_max_pages(max_pages.or(config.max_catalog_pages));
            let catalog = load_catalog_with_spinner(&client, cli.verbose)?;
            println!("✔ {}件の指標を取得", catalog.len());

            export::csv::write_catalog(&catalog, &output)
                .with_context(|| format!("カタログの保存に失敗: {}", output.display()))?;
            println!("✔ 結果を保存: {}", output.display());
        }

        Commands::Info { code } => {
            let client = GhoClient::from_config(&config)?;
            match client.lookup_indicator(&code)? {
                Some(IndicatorRecord { code, name }) => {
                    println!("コード: {}", code);
                    println!("名称:   {}", if name.is_empty() { "(なし)" } else { name.as_str() });
                    println!("データ: {}/{}", client.base_url(), code);
                }
                None => bail!("指標コードが見つかりません: {}", code),
            }
        }

        Commands::Config { set_base_url, show } => {
            let mut config = config;

            if let Some(url) = set_base_url {
                config.set_base_url(url)?;
                println!("✔ ベースURLを設定しました");
            }

            if show {
                println!("設定:");
                println!("  ベースURL: {}", config.base_url);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  候補数: {}", config.top_k);
                println!(
                    "  最大ページ数: {}",
                    config
                        .max_catalog_pages
                        .map(|n| n.to_string())
                        .unwrap_or_else(|| "無制限".into())
                );
                println!("  出力先: {}", config.output_dir.display());
            }
        }
    }

    Ok(())
}

/// スピナーを表示しながらカタログを取得
fn load_catalog_with_spinner(
    client: &GhoClient,
    verbose: bool,
) -> gho_indicators::error::Result<Vec<IndicatorRecord>> {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = client.load_catalog_with_progress(|page, count| {
        spinner.set_message(format!("{}ページ目 ({}件)", page, count));
        if verbose {
            spinner.println(format!("  ページ{}: 累計{}件", page, count));
        }
    });

    spinner.finish_and_clear();
    result
}

fn print_report_preview(rows: &[MatchReportRow], limit: usize) {
    println!("{:<50} {:>4} {:<36} {:>6}  IndicatorName", "RequestedIndicator", "Rank", "IndicatorCode", "Sim");
    for row in rows.iter().take(limit) {
        println!(
            "{:<50} {:>4} {:<36} {:>6}  {}",
            truncate(&row.requested_indicator, 50),
            row.rank.map(|r| r.to_string()).unwrap_or_default(),
            row.indicator_code,
            row.similarity.map(|s| format!("{:.3}", s)).unwrap_or_default(),
            row.indicator_name,
        );
    }
    if rows.len() > limit {
        println!("... 他{}行", rows.len() - limit);
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}
