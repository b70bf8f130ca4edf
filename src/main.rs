use albummer::config::{self, Config, SortOrder};
use albummer::{generate, output, template};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(name = "albummer")]
#[command(about = "Compile an album description and a media folder into one HTML page")]
#[command(long_about = "\
Compile an album description and a media folder into one HTML page

An album is a plain-text file:

  :folder pics              # media folder, relative to the album (required)
  :use default.css          # stylesheet inlined into the page
  :show_filenames           # caption each media cell with its file name

  # Summer                  # markdown prose

  beach.jpg   dunes.jpg     # media line: one row, one cell per file
  surf.mp4

Supported media: .png .jpg .jpeg images, .mp4 video, .wav audio.
The page is written next to the album with its extension replaced.

Run 'albummer make-template' to start an album from a folder, and
'albummer gen-config' for a documented albummer.toml.")]
#[command(version)]
struct Cli {
    /// Config file (default: albummer.toml next to the album or template)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile an album into a self-contained HTML page
    Generate {
        /// Album description file
        album: PathBuf,
    },
    /// Write a starter album listing every media file in a folder
    MakeTemplate {
        /// Media folder
        folder: PathBuf,
        /// Album file to write
        output: PathBuf,
        /// Images per line
        num_cols: Option<usize>,
        /// "asc" for oldest first, anything else for newest first
        order: Option<String>,
        /// Stylesheet for the `:use` line
        css: Option<String>,
    },
    /// Print a stock albummer.toml with all options documented
    GenConfig,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Generate { album } => {
            let config = load_config(cli.config.as_deref(), &album)?;
            init_thread_pool(&config.processing);

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    output::print_progress(&event);
                }
            });
            let result = generate::generate(&album, &config, Some(tx));
            printer.join().ok();

            output::print_generate_summary(&album, &result?);
        }
        Command::MakeTemplate {
            folder,
            output: album,
            num_cols,
            order,
            css,
        } => {
            let mut config = load_config(cli.config.as_deref(), &album)?;
            if let Some(columns) = num_cols {
                config.template.columns = columns;
            }
            if let Some(order) = order {
                config.template.order = SortOrder::from_arg(&order);
            }
            if let Some(css) = css {
                config.template.stylesheet = css;
            }
            config.validate()?;

            let written = template::write_template(&folder, &album, &config.template)?;
            output::print_template_summary(&written);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Explicit `--config`, else `albummer.toml` beside `album`.
fn load_config(explicit: Option<&Path>, album: &Path) -> Result<Config, config::ConfigError> {
    match explicit {
        Some(path) => config::load_config_file(path),
        None => {
            let dir = album
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            config::load_config(dir)
        }
    }
}

/// Warnings and errors to stderr; `RUST_LOG` overrides.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
