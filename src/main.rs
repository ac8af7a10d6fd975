//! svg-iconset CLI
//!
//! Usage:
//!   svg-iconset [OPTIONS] [INPUT]
//!
//! Options:
//!   -o, --output-dir <DIR>    Directory for the generated PNGs
//!   -s, --sizes <N,N,...>     Edge lengths to generate
//!   -c, --config <FILE>       Config file (TOML format)
//!   --rasterizer <PROGRAM>    rsvg-convert compatible rasterizer
//!   --temp-path <FILE>        Path of the intermediate SVG
//!   -k, --keep-going          Continue after a size fails to rasterize
//!   -v, --verbose             More log output (repeatable)
//!   -h, --help                Print help

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use svg_iconset::{generate, BatchConfig, ConfigFile, RasterizerConfig};

#[derive(Parser)]
#[command(name = "svg-iconset")]
#[command(about = "Render an SVG into a set of square PNG icons")]
struct Cli {
    /// Source SVG (overrides `source` from the config file)
    input: Option<PathBuf>,

    /// Directory for the generated PNGs
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Comma separated edge lengths, e.g. 16,32,64
    #[arg(short, long, value_delimiter = ',')]
    sizes: Option<Vec<u32>>,

    /// Config file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// rsvg-convert compatible rasterizer program
    #[arg(long)]
    rasterizer: Option<String>,

    /// Path of the intermediate SVG
    #[arg(long)]
    temp_path: Option<PathBuf>,

    /// Continue after a size fails to rasterize
    #[arg(short, long)]
    keep_going: bool,

    /// More log output (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Apply command line values over a config file
    fn merge_into(self, mut file: ConfigFile) -> ConfigFile {
        if self.input.is_some() {
            file.source = self.input;
        }
        if self.output_dir.is_some() {
            file.output_dir = self.output_dir;
        }
        if self.sizes.is_some() {
            file.sizes = self.sizes;
        }
        if self.temp_path.is_some() {
            file.temp_path = self.temp_path;
        }
        if let Some(program) = self.rasterizer {
            let args = file.rasterizer.take().map(|r| r.args).unwrap_or_default();
            file.rasterizer = Some(RasterizerConfig::new(program).with_args(args));
        }
        if self.keep_going {
            file.keep_going = Some(true);
        }
        file
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Load config file
    let file = match &cli.config {
        Some(path) => match ConfigFile::from_file(path) {
            Ok(file) => file,
            Err(e) => {
                error!("Error loading config '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => ConfigFile::default(),
    };

    let config = match BatchConfig::try_from(cli.merge_into(file)) {
        Ok(config) => config,
        Err(e) => {
            error!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match generate(config) {
        Ok(report) if report.is_success() => ExitCode::SUCCESS,
        Ok(report) => {
            for failure in &report.failed {
                error!(size = failure.size.get(), "{}", failure.reason);
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            match e.diagnostic() {
                Some(report) => eprintln!("{}", report),
                None => error!("Error: {}", e),
            }
            ExitCode::FAILURE
        }
    }
}
