//! DropLens CLI: forecast, rate ladder, batch sweep and config commands.
//!
//! Commands:
//! - `forecast`: per-outcome acquisition cost and batch profitability
//! - `rates`: sliding-rate ladder and per-sub-batch cost of the selected batch
//! - `sweep`: batch summary across several batch sizes
//! - `contexts`: list contexts available in the data directory
//! - `init-config`: write a default `droplens.toml`

mod render;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use droplens_core::outcome_set::{sort_rows, SortKey};
use droplens_core::provider::json_dir::SNAPSHOT_FILE;
use droplens_core::provider::{fetch_inputs, JsonDirProvider};
use droplens_core::report::{export_forecast_json, export_rows_csv, export_summary_json};
use droplens_core::{ContextKey, DropLensConfig, ForecastEngine, ParamOverrides};

#[derive(Parser)]
#[command(
    name = "droplens",
    about = "DropLens CLI: drop outcome forecasting and acquisition cost"
)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Forecast acquisition cost and P&L for every outcome.
    Forecast {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        params: ParamArgs,

        /// Sort column: ev, probability, chance, value, cost, pnl, pnl_all.
        #[arg(long, default_value = "ev")]
        sort: String,

        /// Show at most this many rows.
        #[arg(long)]
        limit: Option<usize>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Only print the batch summary (table or JSON).
        #[arg(long, default_value_t = false)]
        summary_only: bool,

        /// Write to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show the sliding-rate ladder and the sub-batch breakdown of the batch.
    Rates {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        params: ParamArgs,

        /// Number of sub-batch rates to list.
        #[arg(long, default_value_t = 15)]
        count: usize,
    },
    /// Summarize profitability across several batch sizes.
    Sweep {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        params: ParamArgs,

        /// Comma-separated batch sizes (e.g. 1000,5000,20000).
        #[arg(long, value_delimiter = ',', required = true)]
        batches: Vec<u64>,

        /// Print the summaries as JSON lines.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List contexts found in the data directory.
    Contexts {
        /// Data directory. Defaults to the config value, then ./data.
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Write a default config file.
    InitConfig {
        /// Destination. Defaults to the user config directory.
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Data directory holding one subdirectory per context.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Context (game/league) to forecast.
    #[arg(long)]
    context: Option<String>,
}

#[derive(Args)]
struct ParamArgs {
    /// Draws in the planned batch.
    #[arg(long)]
    batch: Option<u64>,

    /// Rate lost per completed sub-batch.
    #[arg(long)]
    step_decay: Option<f64>,

    /// Draws bought at one rate before it degrades.
    #[arg(long)]
    sub_batch: Option<f64>,

    /// Hide priced outcomes worth less than this.
    #[arg(long)]
    min_price: Option<f64>,
}

impl ParamArgs {
    fn overrides(&self) -> ParamOverrides {
        ParamOverrides {
            selected_batch_size: self.batch,
            rate_step_decay: self.step_decay,
            sub_batch_size: self.sub_batch,
            min_price_filter: self.min_price,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Forecast {
            source,
            params,
            sort,
            limit,
            format,
            summary_only,
            output,
        } => run_forecast(
            &source,
            &params,
            &sort,
            limit,
            format,
            summary_only,
            output.as_deref(),
        ),
        Commands::Rates {
            source,
            params,
            count,
        } => run_rates(&source, &params, count),
        Commands::Sweep {
            source,
            params,
            batches,
            json,
        } => run_sweep(&source, &params, &batches, json),
        Commands::Contexts { data_dir, config } => run_contexts(data_dir, config.as_deref()),
        Commands::InitConfig { path, force } => run_init_config(path, force),
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose {
        "droplens=debug,droplens_core=debug,info"
    } else {
        "droplens=info,droplens_core=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

// ── Config & inputs ──────────────────────────────────────────────────

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("droplens")
        .join("droplens.toml")
}

/// Explicit `--config` must exist; the default location is optional.
fn resolve_config(explicit: Option<&Path>) -> Result<DropLensConfig> {
    match explicit {
        Some(path) => DropLensConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => {
            let path = default_config_path();
            if path.is_file() {
                DropLensConfig::load(&path)
                    .with_context(|| format!("failed to load config {}", path.display()))
            } else {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(DropLensConfig::default())
            }
        }
    }
}

/// Fetch inputs and return a loaded engine plus the context it was loaded for.
fn load_engine(source: &SourceArgs, params: &ParamArgs) -> Result<(ForecastEngine, ContextKey)> {
    let config = resolve_config(source.config.as_deref())?;
    let data_dir = source
        .data_dir
        .clone()
        .unwrap_or_else(|| config.source.data_dir.clone());
    let Some(context) = source.context.clone().or(config.source.context.clone()) else {
        bail!("no context given: pass --context or set source.context in the config");
    };
    let context = ContextKey::new(context);

    let provider = JsonDirProvider::new(&data_dir);
    let inputs = fetch_inputs(&provider, &provider, &context)
        .with_context(|| format!("failed to read inputs from {}", data_dir.display()))?;

    let overrides = params.overrides();
    if !overrides.is_empty() {
        tracing::debug!(?overrides, "applying command-line parameter overrides");
    }
    let forecast_params = config.forecast.with_overrides(&overrides);
    let mut engine = ForecastEngine::new(forecast_params);
    engine.load_priced(&inputs.outcomes, inputs.snapshot.as_ref());

    if !engine.has_data() {
        tracing::warn!(%context, "no usable market data; economic figures are zero");
    }
    Ok((engine, context))
}

fn emit(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote forecast");
        }
        None => println!("{content}"),
    }
    Ok(())
}

// ── Commands ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
fn run_forecast(
    source: &SourceArgs,
    params: &ParamArgs,
    sort: &str,
    limit: Option<usize>,
    format: OutputFormat,
    summary_only: bool,
    output: Option<&Path>,
) -> Result<()> {
    let Some(sort_key) = SortKey::parse(sort) else {
        bail!("unknown sort column '{sort}' (expected ev, probability, chance, value, cost, pnl, pnl_all)");
    };
    let (engine, context) = load_engine(source, params)?;

    let mut rows = engine.visible_rows();
    sort_rows(&mut rows, sort_key);
    if let Some(limit) = limit {
        rows.truncate(limit);
    }
    let summary = engine.summary();

    let content = match format {
        OutputFormat::Table if summary_only => render::summary_block(&context, &summary),
        OutputFormat::Json if summary_only => export_summary_json(&summary)?,
        OutputFormat::Csv if summary_only => {
            bail!("--summary-only is not available for CSV output")
        }
        OutputFormat::Table => {
            let mut out = render::summary_block(&context, &summary);
            out.push('\n');
            out.push_str(&render::rows_table(&rows));
            out
        }
        OutputFormat::Json => export_forecast_json(&summary, &rows)?,
        OutputFormat::Csv => export_rows_csv(rows.iter().copied())?,
    };
    emit(&content, output)
}

fn run_rates(source: &SourceArgs, params: &ParamArgs, count: usize) -> Result<()> {
    let (engine, context) = load_engine(source, params)?;
    let rates: Vec<f64> = (0..count as u64)
        .map(|i| engine.rate_for_sub_batch_index(i))
        .collect();

    println!("{}", render::rate_ladder(&context, &engine, &rates));
    println!("{}", render::breakdown_table(&engine.batch_breakdown()));
    Ok(())
}

fn run_sweep(source: &SourceArgs, params: &ParamArgs, batches: &[u64], json: bool) -> Result<()> {
    let (mut engine, context) = load_engine(source, params)?;

    let mut summaries = Vec::with_capacity(batches.len());
    for &batch in batches {
        engine.set_selected_batch_size(batch);
        engine.recompute_dynamic();
        summaries.push(engine.summary());
    }

    if json {
        for summary in &summaries {
            println!("{}", serde_json::to_string(summary)?);
        }
    } else {
        println!("{}", render::sweep_table(&context, &summaries));
    }
    Ok(())
}

fn run_contexts(data_dir: Option<PathBuf>, config: Option<&Path>) -> Result<()> {
    let config = resolve_config(config)?;
    let data_dir = data_dir.unwrap_or(config.source.data_dir);
    let provider = JsonDirProvider::new(&data_dir);
    let contexts = provider
        .contexts()
        .with_context(|| format!("failed to list {}", data_dir.display()))?;

    if contexts.is_empty() {
        println!("No contexts in {}", data_dir.display());
    }
    for ctx in contexts {
        let has_snapshot = provider.context_dir(&ctx).join(SNAPSHOT_FILE).is_file();
        println!("{ctx}{}", if has_snapshot { "" } else { "  (no snapshot)" });
    }
    Ok(())
}

fn run_init_config(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = path.unwrap_or_else(default_config_path);
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    DropLensConfig::default()
        .save(&path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}
