//! stock-trend entry point: CLI wiring and config-driven analysis.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::process;

use stock_trend::chart::{self, ChartReport};
use stock_trend::cli::{self, CliOptions};
use stock_trend::config::AnalyzerConfig;
use stock_trend::io::export::export_csv;
use stock_trend::logging::init_logger;
use stock_trend::{Error, Result, TrendAnalyzer};

fn load_config(path: Option<&Path>) -> AnalyzerConfig {
    let config = match path {
        Some(path) => match AnalyzerConfig::from_toml_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        },
        None => AnalyzerConfig::default(),
    };

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }
    config
}

/// Analyzes the input payload, prints each report, and writes requested outputs.
fn run_analysis(input: &Path, opts: &CliOptions, config: &AnalyzerConfig) -> Result<()> {
    log::info!("Loading chart data from {}", input.display());
    let mut charts = chart::load_chart_file(input)?;

    if let Some(id) = &opts.series {
        let selected = charts
            .remove(id)
            .ok_or_else(|| Error::UnknownSeries(id.clone()))?;
        charts.clear();
        charts.insert(id.clone(), selected);
    }

    let analyzer = TrendAnalyzer::new(config.trend);
    let reports = chart::analyze_charts(&charts, &analyzer, config.report.decimals)?;

    for report in &reports {
        println!("{report}\n");
    }

    if let Some(path) = &opts.json_out {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &reports)?;
        log::info!("Reports written to {}", path.display());
    }

    if let Some(path) = &opts.csv_out {
        let report = single_report(&reports)?;
        export_csv(&report.analysis, path)?;
        log::info!("Trendline for series {} written to {}", report.id, path.display());
    }

    Ok(())
}

fn single_report(reports: &[ChartReport]) -> Result<&ChartReport> {
    match reports {
        [report] => Ok(report),
        _ => Err(Error::Usage(
            "--csv-out needs --series when the input holds several series".to_string(),
        )),
    }
}

fn main() {
    let opts = match cli::parse_args() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(2);
        }
    };

    init_logger(opts.verbose);
    log::debug!("Starting stock-trend v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(opts.config.as_deref());

    if let Some(input) = &opts.input {
        if let Err(e) = run_analysis(input, &opts, &config) {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }

    #[cfg(feature = "api")]
    if opts.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(stock_trend::api::AppState {
            analyzer: TrendAnalyzer::new(config.trend),
            decimals: config.report.decimals,
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], opts.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        if let Err(e) = rt.block_on(stock_trend::api::serve(state, addr)) {
            eprintln!("error: API server failed: {e}");
            process::exit(1);
        }
    }
}
