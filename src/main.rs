use clap::{Parser, Subcommand};
use live_gal::gallery::Gallery;
use live_gal::imaging::{data_url, sniff_mime};
use live_gal::layout::column_count_for_width;
use live_gal::types::SettingsUpdate;
use live_gal::{config, output};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Viewport assumed by `columns` when neither `--width` nor `--count` is given.
const DEFAULT_VIEWPORT_WIDTH: u32 = 1280;

#[derive(Parser)]
#[command(name = "live-gal")]
#[command(about = "Live event photo gallery")]
#[command(long_about = "\
Live event photo gallery

Photos are shrunk to at most 1600px on the long edge, re-encoded as JPEG,
and kept newest first. Files selected together are shown in the order you
selected them.

Data directory:

  .live-gal/
  ├── config.toml            # Optional, see 'live-gal gen-config'
  ├── event_photos.json      # Photo collection
  └── event_settings.json    # Title and banner

When the storage quota is reached only the 50 newest photos are kept on
disk; the rest stay visible until the session ends.")]
#[command(version)]
struct Cli {
    /// Data directory holding the gallery
    #[arg(long, default_value = ".live-gal", global = true)]
    data_dir: PathBuf,

    /// More log output on stderr (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Transcode photos and add them to the gallery as one batch
    Ingest {
        /// Image files or directories (searched recursively)
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// List photos, newest first
    List,
    /// Delete photos by id
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Show or change the gallery title and banner
    Settings {
        #[arg(long)]
        title: Option<String>,
        /// Image file to embed as the banner
        #[arg(long, conflicts_with = "banner_url")]
        banner_file: Option<PathBuf>,
        /// Remote banner image URL
        #[arg(long)]
        banner_url: Option<String>,
    },
    /// Show the waterfall column assignment
    Columns {
        /// Viewport width in pixels; picks the column count
        #[arg(long, conflicts_with = "count")]
        width: Option<u32>,
        /// Explicit column count
        #[arg(long)]
        count: Option<NonZeroUsize>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Ingest { paths } => {
            let mut gallery = Gallery::open(&cli.data_dir)?;
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_ingest_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let outcome = gallery.ingest_paths(&paths, Some(&tx));
            drop(tx);
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;
            output::print_ingest_summary(&outcome, gallery.photos().len());
        }
        Command::List => {
            let gallery = Gallery::open(&cli.data_dir)?;
            output::print_photo_list(gallery.photos());
        }
        Command::Delete { ids } => {
            let mut gallery = Gallery::open(&cli.data_dir)?;
            for id in &ids {
                let result = gallery.delete_photo(id);
                output::print_delete(id, result);
            }
        }
        Command::Settings {
            title,
            banner_file,
            banner_url,
        } => {
            let mut gallery = Gallery::open(&cli.data_dir)?;
            let banner_payload = match banner_file {
                Some(path) => Some(banner_from_file(&path)?),
                None => banner_url,
            };
            let update = SettingsUpdate {
                title,
                banner_payload,
            };
            let persisted = if update.is_empty() {
                None
            } else {
                Some(gallery.update_settings(update))
            };
            output::print_settings(gallery.settings(), persisted);
        }
        Command::Columns { width, count } => {
            let gallery = Gallery::open(&cli.data_dir)?;
            let columns = count.unwrap_or_else(|| {
                column_count_for_width(width.unwrap_or(DEFAULT_VIEWPORT_WIDTH))
            });
            output::print_columns(&gallery.columns(columns));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr so stdout carries only command output.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Embed an image file as a data URL, as-is.
fn banner_from_file(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let bytes = std::fs::read(path)?;
    let mime = sniff_mime(&bytes)
        .ok_or_else(|| format!("{} is not a recognized image", path.display()))?;
    Ok(data_url(mime, &bytes))
}
