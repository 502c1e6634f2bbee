use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;

use parcelkml::config::FileConfig;
use parcelkml::kml::{self, KmlEncoder, Skipped};
use parcelkml::{LandParcel, ParcelRecord, centroid, geodesic_area_hectares};

/// Land-parcel boundaries to and from KML
///
/// Examples:
///   # Export parcels (JSON array of parcel records) for inspection
///   parcelkml export -i parcels.json -o parcels.kml
///
///   # Import a KML file as parcel drafts
///   parcelkml import -i survey.kml -o drafts.json
///
///   # Show areas, tiers and centroids of every parcel in a KML file
///   parcelkml inspect -i survey.kml
#[derive(Parser, Debug)]
#[command(name = "parcelkml")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches parcelkml.toml if not provided)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode parcel records into a KML document
    Export {
        /// JSON file with an array of parcel records
        #[arg(short = 'i', long)]
        input: PathBuf,

        /// Output KML path (defaults to the input path with a .kml extension)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
    /// Decode a KML document into parcel drafts
    Import {
        /// KML file to read
        #[arg(short = 'i', long)]
        input: PathBuf,

        /// Write drafts as JSON here instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
    /// Print per-parcel measurements for a KML document
    Inspect {
        /// KML file to read
        #[arg(short = 'i', long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // The config can turn on verbose logging, so it is read before the
    // logger exists and its warnings are logged afterwards
    let (file_config, config_warnings) = match args.config {
        Some(ref path) => (FileConfig::from_path(path)?, Vec::new()),
        None => {
            let (config, warnings) = FileConfig::load();
            (config.unwrap_or_default(), warnings)
        }
    };

    let verbose = args.verbose || file_config.verbose;
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    for warning in &config_warnings {
        log::warn!("{}", warning);
    }

    match args.command {
        Command::Export { input, output } => {
            let output = output.unwrap_or_else(|| input.with_extension("kml"));
            export(&input, &output, KmlEncoder::new(file_config.export))
        }
        Command::Import { input, output } => import(&input, output.as_deref()),
        Command::Inspect { input } => inspect(&input),
    }
}

fn export(input: &Path, output: &Path, encoder: KmlEncoder) -> Result<()> {
    let start = Instant::now();

    let contents = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read parcel file: {}", input.display()))?;
    let records: Vec<ParcelRecord> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse parcel records: {}", input.display()))?;
    let parcels: Vec<LandParcel> = records.into_iter().map(LandParcel::from).collect();

    let (document, skipped) = encoder.encode_with_report(&parcels);
    std::fs::write(output, &document)
        .with_context(|| format!("Failed to write KML file: {}", output.display()))?;

    println!(
        "Exported {} of {} parcels ({:.1} KB) [{:.1}s]",
        parcels.len() - skipped.len(),
        parcels.len(),
        document.len() as f64 / 1024.0,
        start.elapsed().as_secs_f32()
    );
    print_skipped(&skipped);
    println!("Output: {}", output.display());

    Ok(())
}

fn import(input: &Path, output: Option<&Path>) -> Result<()> {
    let contents = read_kml(input)?;
    let report = kml::decode_with_report(&contents)
        .with_context(|| format!("Failed to decode KML file: {}", input.display()))?;

    let json =
        serde_json::to_string_pretty(&report.parcels).context("Failed to serialize drafts")?;

    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write drafts: {}", path.display()))?;
            println!(
                "Imported {} parcels, skipped {}",
                report.parcels.len(),
                report.skipped.len()
            );
            print_skipped(&report.skipped);
            println!("Output: {}", path.display());
        }
        None => {
            println!("{}", json);
            for s in &report.skipped {
                eprintln!("Skipped placemark {}", s);
            }
        }
    }

    Ok(())
}

fn inspect(input: &Path) -> Result<()> {
    let contents = read_kml(input)?;
    let report = kml::decode_with_report(&contents)
        .with_context(|| format!("Failed to decode KML file: {}", input.display()))?;

    for (i, draft) in report.parcels.iter().enumerate() {
        let name = draft.name.as_deref().unwrap_or("(unnamed)");
        println!("{}. {}", i + 1, name);
        println!("  Vertices:      {}", draft.coordinates.len());
        println!("  Area:          {:.2} ha", draft.area);
        println!(
            "  Geodesic area: {:.2} ha",
            geodesic_area_hectares(&draft.coordinates)
        );
        println!("  Size tier:     {:?}", parcelkml::domain::tier(draft.area));
        if let Some(c) = centroid(&draft.coordinates) {
            println!("  Centroid:      ({:.6}, {:.6})", c.lat, c.lng);
        }
    }
    print_skipped(&report.skipped);

    Ok(())
}

fn read_kml(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read KML file: {}", path.display()))
}

fn print_skipped(skipped: &[Skipped]) {
    if skipped.is_empty() {
        return;
    }
    println!("Skipped {}:", skipped.len());
    for s in skipped {
        println!("  {}", s);
    }
}
