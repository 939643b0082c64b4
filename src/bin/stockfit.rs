use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use stockfit::{
    analysis, display, score::Selection, synthetic::POPULAR_SYMBOLS, AnalysisConfig,
    PredictionBundle,
};

#[derive(Parser, Debug)]
#[command(name = "stockfit")]
#[command(about = "Fit trend models to a synthetic price series and forecast it", long_about = None)]
struct Args {
    /// Ticker symbol to label the series with
    #[arg(short, long, default_value = "AAPL")]
    symbol: String,

    /// Days of history to generate
    #[arg(short, long)]
    days: Option<usize>,

    /// Days to predict
    #[arg(long)]
    horizon: Option<usize>,

    /// Moving-average baseline window
    #[arg(short, long)]
    window: Option<usize>,

    /// Seed for a reproducible series
    #[arg(long)]
    seed: Option<u64>,

    /// Model selection criterion: r-squared, aic or bic
    #[arg(long)]
    selection: Option<Selection>,

    /// TOML config file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the whole analysis as JSON
    #[arg(long)]
    json: bool,

    /// Write a PNG chart to this path (requires the `plotting` feature)
    #[arg(long)]
    plot: Option<PathBuf>,

    /// List the built-in symbols and exit
    #[arg(long)]
    list_symbols: bool,
}

impl Args {
    fn config(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => AnalysisConfig::default(),
        };

        if let Some(days) = self.days {
            config.history_days = days;
        }
        if let Some(horizon) = self.horizon {
            config.horizon = horizon;
        }
        if let Some(window) = self.window {
            config.moving_average_window = window;
        }
        if let Some(selection) = self.selection {
            config.selection = selection;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate().context("Invalid settings")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    if args.list_symbols {
        for symbol in POPULAR_SYMBOLS {
            println!("{symbol}");
        }
        return Ok(());
    }

    let config = args.config()?;
    let symbol = args.symbol.to_uppercase();
    let analysis = analysis::run(&symbol, &config)
        .with_context(|| format!("Failed to analyze {symbol}"))?;

    if let Some(path) = &args.plot {
        write_chart(&analysis.bundle, path)?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!("{}", display::summary(&analysis.bundle));
    println!("Model comparison ({} days, * = best R²)", config.history_days);
    println!("{}", display::comparison_table(&analysis.comparison));
    println!("Predictions ({} confidence)", config.confidence);
    print!("{}", display::prediction_table(&analysis.bundle.predictions));
    Ok(())
}

#[cfg(feature = "plotting")]
fn write_chart(bundle: &PredictionBundle, path: &Path) -> Result<()> {
    stockfit::plot::plot_bundle(bundle, path, stockfit::plot::DEFAULT_SIZE)
        .with_context(|| format!("Failed to write chart to {}", path.display()))
}

#[cfg(not(feature = "plotting"))]
fn write_chart(_bundle: &PredictionBundle, path: &Path) -> Result<()> {
    anyhow::bail!(
        "Cannot write {}: stockfit was built without the `plotting` feature",
        path.display()
    )
}
