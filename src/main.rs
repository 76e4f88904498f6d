use clap::{Parser, Subcommand};
use rom_catalog::config::{self, CatalogConfig};
use rom_catalog::{output, pipeline, serve, validate};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::LazyLock;

static VERSION: LazyLock<String> = LazyLock::new(rom_catalog::version_string);

#[derive(Parser)]
#[command(name = "rom-catalog")]
#[command(about = "Static site generator for device ROM download catalogs")]
#[command(long_about = "\
Static site generator for device ROM download catalogs

Each JSON file in the data directory describes one device. The file name
(without .json) is the device code; the file lists the ROM versions and their
download links.

Input layout:

  data/
  ├── GM1900.json                  # {\"name\": \"OnePlus 7\", \"roms\": [...]}
  └── LE2110.json

  Each ROM entry: {\"version\": \"10.3.8\", \"links\": [\"https://...\", ...]}

Output layout:

  docs/
  ├── index.html                   # Searchable catalog page
  ├── .nojekyll
  └── data/
      ├── devices.json             # Index: code, name, romCount, linkCount
      └── GM1900.json              # Detail: code, name, roms

Malformed device files are logged and skipped by 'build'; 'validate' reports
every defect and exits with status 1 when any file is invalid.

Run 'rom-catalog gen-config' to generate a documented catalog.toml.")]
#[command(version = VERSION.as_str())]
struct Cli {
    /// Config file (default: ./catalog.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Device record directory
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Output directory
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the catalog site: JSON data files and index.html
    Build,
    /// Check every device record without building
    Validate,
    /// Serve the output directory for local preview
    Serve {
        /// Port to listen on
        #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
        port: Option<u16>,
    },
    /// Print a stock catalog.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match &cli.command {
        Command::Build => {
            let config = load_config(&cli, None)?;
            println!("==> Building {}", config.input_dir.display());
            let generator = format!("rom-catalog {}", VERSION.as_str());
            let summary = pipeline::build(&config, &generator)?;
            output::print_build_output(&summary);
        }
        Command::Validate => {
            let config = load_config(&cli, None)?;
            println!("==> Validating {}", config.input_dir.display());
            let report = validate::validate_dir(&config.input_dir, &config.records.name_field)?;
            output::print_validation_report(&report);
            if !report.is_valid() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Serve { port } => {
            let config = load_config(&cli, *port)?;
            serve::serve(&config.output_dir, config.preview_port)?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Load `catalog.toml` (or `--config`) and apply command-line overrides.
fn load_config(cli: &Cli, port: Option<u16>) -> Result<CatalogConfig, config::ConfigError> {
    let config = config::load_config(cli.config.as_deref(), Path::new("."))?;
    Ok(config.with_overrides(cli.data.clone(), cli.output.clone(), port))
}
