// ==========================================
// 价值工程决策引擎 - 命令行入口
// ==========================================
// 子命令:
// - run: 导入 → 分析 → 导出 → 打印各策略摘要
// - strategies: 列出预设与自定义策略
// ==========================================

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use ve_optimizer::api::{AnalysisApi, AnalysisRequest, AnalysisResponse, ValidationMode};
use ve_optimizer::config::{config_keys, ConfigManager, PipelineConfigReader};
use ve_optimizer::domain::MaterialCategory;
use ve_optimizer::engine::PipelineSettings;
use ve_optimizer::i18n::{category_label, set_locale, strategy_title, t, t_with_args};
use ve_optimizer::importer::CatalogSources;
use ve_optimizer::{logging, APP_NAME, VERSION};

#[derive(Parser)]
#[command(name = "ve-optimizer", version)]
#[command(about = "Construction value-engineering: catalog matching, alternatives, scoring and selection")]
struct Cli {
    /// JSON config file (defaults to <config_dir>/ve-optimizer/config.json when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis and write the export tables
    Run {
        /// Project material schedule (CSV/TSV)
        #[arg(short, long)]
        materials: PathBuf,

        /// Category to use when the schedule has no CATEGORY column
        #[arg(long)]
        default_category: Option<MaterialCategory>,

        /// Window reference catalog
        #[arg(long)]
        windows: Option<PathBuf>,

        /// Exterior door reference catalog
        #[arg(long)]
        exterior_doors: Option<PathBuf>,

        /// Interior door reference catalog
        #[arg(long)]
        interior_doors: Option<PathBuf>,

        /// Appliance price list
        #[arg(long)]
        appliances: Option<PathBuf>,

        /// Output directory for the export tables
        #[arg(short, long)]
        out: PathBuf,

        /// Report language (zh-CN or en); overrides report.locale
        #[arg(long)]
        locale: Option<String>,

        /// Window alternative mode (cheapest or strategic); overrides the config file
        #[arg(long)]
        window_mode: Option<String>,

        /// Reject the whole run when any material fails validation
        #[arg(long)]
        strict: bool,
    },

    /// List canonical and custom strategies
    Strategies {
        /// Report language (zh-CN or en)
        #[arg(long)]
        locale: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.log_json {
        logging::init_json();
    } else {
        logging::init();
    }
    tracing::info!(version = VERSION, "{}", APP_NAME);

    let mut config = ConfigManager::load(cli.config.as_deref()).context("加载配置失败")?;

    match cli.command {
        Commands::Run {
            materials,
            default_category,
            windows,
            exterior_doors,
            interior_doors,
            appliances,
            out,
            locale,
            window_mode,
            strict,
        } => {
            apply_locale(&config, locale)?;
            if let Some(mode) = window_mode {
                config.set(config_keys::WINDOW_MODE, mode);
            }

            let mode = if strict {
                ValidationMode::Strict
            } else {
                ValidationMode::Lenient
            };
            let api = AnalysisApi::from_config(&config, mode)?;

            let request = AnalysisRequest {
                materials,
                default_category,
                catalog: CatalogSources {
                    windows,
                    exterior_doors,
                    interior_doors,
                    appliances,
                },
                out_dir: Some(out.clone()),
            };
            let response = api.analyze_files(&request)?;
            print_summary(&api, &response);
            println!(
                "\n{}",
                tr(
                    "report.exported",
                    &[
                        ("count", response.exported_files.len().to_string()),
                        ("dir", out.display().to_string()),
                    ],
                )
            );
        }

        Commands::Strategies { locale } => {
            apply_locale(&config, locale)?;
            let settings = PipelineSettings::from_config(&config)?;
            println!("{}", t("strategy.list_header"));
            println!("{}", "-".repeat(60));
            for definition in &settings.strategies {
                let w = definition.weights;
                println!("{:<20} {}", definition.strategy_id, strategy_title(definition));
                println!(
                    "{:<20} {}",
                    "",
                    tr(
                        "strategy.weights",
                        &[
                            ("functional", format!("{:.2}", w.functional)),
                            ("design", format!("{:.2}", w.design)),
                            ("cost", format!("{:.2}", w.cost)),
                        ],
                    )
                );
            }
        }
    }

    Ok(())
}

/// 命令行参数优先, 其次配置文件
fn apply_locale(config: &ConfigManager, cli_locale: Option<String>) -> Result<()> {
    let locale = match cli_locale {
        Some(locale) => locale,
        None => config.get_report_locale()?,
    };
    set_locale(&locale);
    Ok(())
}

/// 翻译（参数为拥有所有权的字符串）
fn tr(key: &str, args: &[(&str, String)]) -> String {
    let borrowed: Vec<(&str, &str)> = args.iter().map(|(k, v)| (*k, v.as_str())).collect();
    t_with_args(key, &borrowed)
}

fn money(value: f64) -> String {
    format!("{:.2}", value)
}

fn print_summary(api: &AnalysisApi, response: &AnalysisResponse) {
    let report = &response.report;

    println!("{}", t("report.title"));
    println!("{}", "=".repeat(60));
    println!("{}", tr("report.run_id", &[("run_id", report.run_id.clone())]));

    for summary in &response.import_summaries {
        println!(
            "{}",
            tr(
                "report.import_line",
                &[
                    ("file", summary.file.clone()),
                    ("total", summary.total_rows.to_string()),
                    ("imported", summary.imported.to_string()),
                    ("skipped", summary.skipped_zero_quantity.to_string()),
                    ("unparsable", summary.unparsable_costs.to_string()),
                ],
            )
        );
    }
    if !response.violations.is_empty() {
        println!(
            "{}",
            tr(
                "report.violations",
                &[("count", response.violations.len().to_string())],
            )
        );
    }
    println!(
        "{}",
        tr("report.matched", &[("count", report.matched.len().to_string())])
    );
    println!(
        "{}",
        tr("report.unmatched", &[("count", report.unmatched_count().to_string())])
    );

    for definition in api.strategies() {
        let Some(run) = report.strategy_run(&definition.strategy_id) else {
            continue;
        };
        println!();
        println!(
            "{}",
            tr("report.strategy_header", &[("title", strategy_title(definition))])
        );
        println!("{}", "-".repeat(60));

        for (group, m) in &run.categories {
            if m.num_materials == 0 {
                continue;
            }
            println!(
                "  {}",
                tr(
                    "report.line",
                    &[
                        ("scope", category_label(*group)),
                        ("original", money(m.total_original_cost)),
                        ("selected", money(m.total_selected_cost)),
                        ("savings", money(m.total_cost_savings)),
                        ("pct", format!("{:.1}", m.cost_reduction_pct)),
                    ],
                )
            );
        }

        let overall = &run.overall;
        println!(
            "  {}",
            tr(
                "report.line",
                &[
                    ("scope", t("category.overall")),
                    ("original", money(overall.total_original_cost)),
                    ("selected", money(overall.total_selected_cost)),
                    ("savings", money(overall.total_cost_savings)),
                    ("pct", format!("{:.1}", overall.cost_reduction_pct)),
                ],
            )
        );
        println!(
            "  {}",
            tr(
                "report.scores",
                &[
                    ("functional", format!("{:.2}", overall.avg_functional_score)),
                    ("design", format!("{:.2}", overall.avg_design_score)),
                    ("cost", format!("{:.2}", overall.avg_cost_score)),
                ],
            )
        );
    }
}
