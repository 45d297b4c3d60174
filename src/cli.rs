use std::env;
use std::path::PathBuf;

#[cfg(feature = "api")]
const DEFAULT_PORT: u16 = 3000;

pub struct CliOptions {
    pub input: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub series: Option<String>,
    pub json_out: Option<PathBuf>,
    pub csv_out: Option<PathBuf>,
    pub verbose: bool,
    #[cfg(feature = "api")]
    pub serve: bool,
    #[cfg(feature = "api")]
    pub port: u16,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(args)
}

fn parse_args_from(args: Vec<String>) -> Result<CliOptions, String> {
    if args.len() == 1 && (args[0] == "--help" || args[0] == "-h") {
        print_usage();
        std::process::exit(0);
    }
    parse_options(&args)
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut opts = CliOptions {
        input: None,
        config: None,
        series: None,
        json_out: None,
        csv_out: None,
        verbose: false,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: DEFAULT_PORT,
    };

    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --input (expected a JSON file path)")?;
                if opts.input.replace(PathBuf::from(path)).is_some() {
                    return Err("--input provided more than once".to_string());
                }
            }
            "--config" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --config (expected a TOML file path)")?;
                if opts.config.replace(PathBuf::from(path)).is_some() {
                    return Err("--config provided more than once".to_string());
                }
            }
            "--series" => {
                i += 1;
                let id = args.next_or_err(i, "missing value for --series (expected a series id)")?;
                if opts.series.replace(id.to_string()).is_some() {
                    return Err("--series provided more than once".to_string());
                }
            }
            "--json-out" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --json-out (expected a file path)")?;
                if opts.json_out.replace(PathBuf::from(path)).is_some() {
                    return Err("--json-out provided more than once".to_string());
                }
            }
            "--csv-out" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --csv-out (expected a file path)")?;
                if opts.csv_out.replace(PathBuf::from(path)).is_some() {
                    return Err("--csv-out provided more than once".to_string());
                }
            }
            "--verbose" | "-v" => opts.verbose = true,
            #[cfg(feature = "api")]
            "--serve" => opts.serve = true,
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --port (expected a u16)")?;
                opts.port = raw
                    .parse::<u16>()
                    .map_err(|_| format!("--port value \"{raw}\" is not a valid u16"))?;
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if opts.input.is_none() && !serving(&opts) {
        return Err("missing required argument `--input`".to_string());
    }

    Ok(opts)
}

#[cfg(feature = "api")]
fn serving(opts: &CliOptions) -> bool {
    opts.serve
}

#[cfg(not(feature = "api"))]
fn serving(_opts: &CliOptions) -> bool {
    false
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("stock-trend: trendline, threshold crossings, and forecast for stock counts");
    eprintln!();
    eprintln!("Usage:");
    eprintln!(
        "  stock-trend --input <chart.json> [--config <file.toml>] [--series <id>] \
         [--json-out <path>] [--csv-out <path>] [--verbose]"
    );
    #[cfg(feature = "api")]
    eprintln!("  stock-trend --serve [--port <u16>] [--config <file.toml>]");
}
