//! Sieve CLI binary.
//!
//! Scores a metric table against a business model's weights and prints the
//! ranking.

use clap::{Parser, Subcommand, ValueEnum};
use sieve::{
    BusinessModel, BusinessModelUniverse, load_weight_spec, screen, screen_semiconductors,
};
use sieve_data::{FundamentalsProvider, MetricProvider, provider_for_path};
use sieve_output::{ExportFormat, Exporter, ScreeningReport};
use sieve_scoring::{
    MetricCategory, MetricInfo, ScoringConfig, ScoringResult, WeightSpec, available_metrics,
    metrics_by_category,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sieve")]
#[command(about = "Sieve: business-model aware stock screener", long_about = None)]
#[command(version)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score and rank companies
    Score {
        /// Business model, e.g. `ad_platform` or `semiconductors:fabless`
        #[arg(long)]
        model: Option<String>,

        /// Metric table (.csv or .json), or fundamentals with --fundamentals
        #[arg(long)]
        data: PathBuf,

        /// Custom weight file (.toml or .json) replacing the model's weights
        #[arg(long)]
        weights: Option<PathBuf>,

        /// Comma-separated tickers to screen instead of the model's universe
        #[arg(long, value_delimiter = ',')]
        tickers: Vec<String>,

        /// Screen every company in the data file
        #[arg(long, conflicts_with = "tickers")]
        all: bool,

        /// Treat the data file as per-company JSON fundamentals
        #[arg(long)]
        fundamentals: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write output to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Composites closer than this are reported as ties
        #[arg(long)]
        epsilon: Option<f64>,

        /// Weigh each semiconductor with its own sub-sector's weights
        #[arg(long, conflicts_with = "weights")]
        per_subsector: bool,
    },

    /// List business models and their weights
    Models,

    /// List known metrics
    Metrics {
        /// Only show one category, e.g. `valuation` or `capital_efficiency`
        #[arg(long)]
        category: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Markdown,
    Csv,
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Score {
            model,
            data,
            weights,
            tickers,
            all,
            fundamentals,
            format,
            output,
            epsilon,
            per_subsector,
        } => {
            let model = model.map(|m| m.parse::<BusinessModel>()).transpose()?;
            if per_subsector && !matches!(model, Some(BusinessModel::Semiconductors(_))) {
                return Err("--per-subsector requires a semiconductors model".into());
            }
            let spec = resolve_spec(model, weights.as_deref())?;

            // An empty universe screens every company in the data file
            let universe = match model {
                Some(_) if per_subsector && !all && tickers.is_empty() => {
                    BusinessModelUniverse::all_semiconductors()
                }
                Some(model) if !all && tickers.is_empty() => model.default_universe(),
                _ => BusinessModelUniverse::custom(tickers),
            };

            let provider: Box<dyn MetricProvider> = if fundamentals {
                Box::new(FundamentalsProvider::load(&data)?)
            } else {
                provider_for_path(&data)?
            };

            let mut config = ScoringConfig::default();
            if let Some(epsilon) = epsilon {
                config.tie_epsilon = epsilon;
            }

            let result = if per_subsector {
                screen_semiconductors(provider.as_ref(), &universe, config)?
            } else {
                screen(provider.as_ref(), &universe, &spec, config)?
            };
            info!(
                ranked = result.ranked.len(),
                unranked = result.unranked.len(),
                "Screening complete"
            );

            let title = match model {
                Some(_) if per_subsector => "Semiconductors by Sub-sector".to_string(),
                Some(m) => m.name(),
                None => spec.name().to_string(),
            };
            let rendered = render(result, &title, format)?;
            match output {
                Some(path) => {
                    fs::write(&path, rendered)?;
                    println!("Wrote {} output to {}", format_name(format), path.display());
                }
                None => print!("{rendered}"),
            }
        }
        Commands::Models => list_models()?,
        Commands::Metrics { category } => list_metrics(category.as_deref())?,
    }

    Ok(())
}

fn resolve_spec(
    model: Option<BusinessModel>,
    weights: Option<&Path>,
) -> Result<WeightSpec, Box<dyn std::error::Error>> {
    match (model, weights) {
        (_, Some(path)) => {
            let spec = load_weight_spec(path)?;
            debug!(path = %path.display(), "Using custom weights");
            Ok(spec)
        }
        (Some(model), None) => Ok(model.weight_spec()?),
        (None, None) => Err("either --model or --weights is required".into()),
    }
}

fn render(
    result: ScoringResult,
    title: &str,
    format: OutputFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    Ok(match format {
        OutputFormat::Csv => result.export_to_string(ExportFormat::Csv)?,
        OutputFormat::Text => ScreeningReport::new(title, result).to_ascii_table(),
        OutputFormat::Markdown => ScreeningReport::new(title, result).to_markdown(),
        OutputFormat::Json => {
            let mut json = ScreeningReport::new(title, result).to_json()?;
            json.push('\n');
            json
        }
    })
}

const fn format_name(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Text => "text",
        OutputFormat::Markdown => "markdown",
        OutputFormat::Csv => "csv",
        OutputFormat::Json => "json",
    }
}

fn list_models() -> Result<(), Box<dyn std::error::Error>> {
    println!("\nAvailable Business Models:");
    println!("{}", "=".repeat(80));

    for model in BusinessModel::all() {
        let spec = model.weight_spec()?;
        println!("\n{} ({})", model.name(), model.key());
        if let Some(description) = model.description() {
            println!("  {description}");
        }
        for (metric, weight) in spec.normalized_weights() {
            let polarity = spec.get(&metric).map_or("", |m| m.polarity.as_str());
            println!("  {:<26} {:>6.1}%  {}", metric, weight * 100.0, polarity);
        }
    }

    println!("\n{}", "=".repeat(80));
    Ok(())
}

fn print_metric(info: &MetricInfo) {
    println!(
        "  {:<26} {:<24} {:<17} {}",
        info.key,
        info.name,
        info.polarity.as_str(),
        info.description
    );
}

fn list_metrics(category: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = match category {
        Some(name) => {
            let category = MetricCategory::parse(name).ok_or_else(|| {
                let known: Vec<String> = MetricCategory::all()
                    .iter()
                    .map(|c| c.name().to_ascii_lowercase().replace(' ', "_"))
                    .collect();
                format!("unknown category '{name}' (known: {})", known.join(", "))
            })?;
            metrics_by_category(category)
        }
        None => available_metrics(),
    };

    println!("\nMetrics ({}):", metrics.len());
    println!("{}", "=".repeat(80));
    for category in MetricCategory::all() {
        let in_category: Vec<&MetricInfo> =
            metrics.iter().filter(|m| m.category == category).collect();
        if in_category.is_empty() {
            continue;
        }
        println!("\n{}:", category.name());
        for info in in_category {
            print_metric(info);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use sieve_scoring::{MetricTable, score};

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_score_args() {
        let cli = Cli::parse_from([
            "sieve", "score", "--model", "ad_platform", "--data", "metrics.csv", "--tickers",
            "META,GOOGL", "--format", "csv",
        ]);
        match cli.command {
            Commands::Score {
                tickers, format, ..
            } => {
                assert_eq!(tickers, vec!["META".to_string(), "GOOGL".to_string()]);
                assert_eq!(format, OutputFormat::Csv);
            }
            _ => panic!("expected score command"),
        }
    }

    #[test]
    fn test_per_subsector_requires_semiconductors() {
        let err = run(Commands::Score {
            model: Some("streaming".into()),
            data: PathBuf::from("metrics.csv"),
            weights: None,
            tickers: Vec::new(),
            all: false,
            fundamentals: false,
            format: OutputFormat::Text,
            output: None,
            epsilon: None,
            per_subsector: true,
        })
        .unwrap_err();
        assert!(err.to_string().contains("--per-subsector"));
    }

    #[test]
    fn test_negative_epsilon_rejected_by_engine() {
        let path = std::env::temp_dir().join(format!("sieve-cli-epsilon-{}.csv", process::id()));
        fs::write(&path, "ticker,fcf_margin\nNFLX,20\nSPOT,10\n").unwrap();
        let err = run(Commands::Score {
            model: Some("streaming".into()),
            data: path.clone(),
            weights: None,
            tickers: vec!["NFLX".into(), "SPOT".into()],
            all: false,
            fundamentals: false,
            format: OutputFormat::Csv,
            output: None,
            epsilon: Some(-0.5),
            per_subsector: false,
        })
        .unwrap_err();
        fs::remove_file(&path).ok();
        assert!(err.to_string().contains("tie"), "{err}");
    }

    #[test]
    fn test_spec_requires_model_or_weights() {
        assert!(resolve_spec(None, None).is_err());
        let spec = resolve_spec(Some(BusinessModel::Streaming), None).unwrap();
        assert_eq!(spec.name(), "streaming");
    }

    #[test]
    fn test_render_csv() {
        let table = MetricTable::new()
            .with_value("NFLX", "fcf_margin", Some(20.0))
            .with_value("SPOT", "fcf_margin", Some(10.0));
        let spec = WeightSpec::builder("streaming")
            .higher("fcf_margin", 1.0)
            .build()
            .unwrap();
        let csv = render(score(&table, &spec), "Streaming", OutputFormat::Csv).unwrap();
        assert!(csv.starts_with("rank,ticker,composite,coverage,fcf_margin"));
        assert!(csv.contains("1,NFLX,1,1,1"));
    }
}
