use clap::Parser;
use media_organizer::config::OrganizerConfig;
use media_organizer::error::OrganizerError;
use media_organizer::geocode::{GeoCache, NominatimClient, ReverseGeocoder};
use media_organizer::metadata::ExifToolSource;
use media_organizer::organizer::Organizer;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "media-organizer", version, about = "Sort photos and videos into a chronological folder tree")]
struct Cli {
    /// Directory to scan for media files.
    source: PathBuf,

    /// Directory to organize into; must be empty or absent.
    destination: PathBuf,

    /// Move files into place instead of copying them.
    #[arg(long = "move")]
    move_files: bool,

    /// Resolve every destination without touching the disk.
    #[arg(long)]
    dry_run: bool,

    /// Skip reverse geocoding; no location folders are created.
    #[arg(long)]
    offline: bool,

    /// Reverse-geocode cache file.
    #[arg(long, default_value = ".cache/geodata.json")]
    cache_file: PathBuf,

    /// Geocode cache cell size in square kilometers.
    #[arg(long, default_value_t = 4.0)]
    cache_accuracy: f64,

    /// Seconds to wait between geocoding calls.
    #[arg(long, default_value_t = 2.0)]
    api_delay: f64,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

#[tokio::main]
async fn main() -> Result<(), OrganizerError> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let mut config = OrganizerConfig::new(cli.source, cli.destination);
    config.move_files = cli.move_files;
    config.dry_run = cli.dry_run;
    config.offline = cli.offline;

    let cache = GeoCache::load(cli.cache_file, cli.cache_accuracy)?;
    let client = NominatimClient::builder()
        .api_delay(Duration::from_secs_f64(cli.api_delay.max(0.0)))
        .build()?;
    let mut organizer = Organizer::builder()
        .config(config)
        .metadata(Box::new(ExifToolSource::new()?))
        .geocoder(ReverseGeocoder::new(cache, client))
        .build();

    let summary = organizer.run().await?;
    println!(
        "Organized {} files ({} skipped, {} failed)",
        summary.processed,
        summary.skipped,
        summary.failures.len()
    );
    for (path, reason) in &summary.failures {
        println!("  {}: {reason}", path.display());
    }
    Ok(())
}
