use clap::{Parser, Subcommand};
use sanity_image::batch::{BatchResult, parse_batch, resolve_batch};
use sanity_image::cache::ResolveCache;
use sanity_image::config::{self, ResolverConfig};
use sanity_image::debounce::{Sample, debounce};
use sanity_image::output;
use sanity_image::resolve::resolve_with;
use sanity_image::sizing::{ObjectPosition, SizingMode};
use sanity_image::types::{Crop, Hotspot, ImageDescriptor, ProjectDetails};
use std::path::{Path, PathBuf};

/// Flags describing one image.
#[derive(clap::Args, Clone)]
struct ImageArgs {
    /// Asset reference, e.g. image-abc123-800x600-jpg
    #[arg(long)]
    asset: String,

    /// Crop fractions as left,right,top,bottom
    #[arg(long, value_parser = parse_crop)]
    crop: Option<Crop>,

    /// Hotspot centre as x,y fractions
    #[arg(long, value_parser = parse_hotspot)]
    hotspot: Option<Hotspot>,

    /// Target aspect ratio (width / height)
    #[arg(long)]
    aspect_ratio: Option<f64>,
}

impl ImageArgs {
    fn descriptor(&self) -> ImageDescriptor {
        let mut image = ImageDescriptor::new(&self.asset);
        image.crop = self.crop;
        image.hotspot = self.hotspot;
        image
    }
}

#[derive(Parser)]
#[command(name = "sanity-image")]
#[command(about = "Resolve cropped image variants on the Sanity image CDN")]
#[command(long_about = "\
Resolve cropped image variants on the Sanity image CDN

Given an asset reference, an optional crop rectangle and an optional target
aspect ratio, prints the exact pixel size of the variant and the URL that
serves it pre-cropped.

  sanity-image --project-id p1 resolve --asset image-abc-800x600-jpg --aspect-ratio 1
  sanity-image --project-id p1 batch images.json
  sanity-image --project-id p1 hint --asset image-abc-800x600-jpg --mode fill --measured 300x300
  sanity-image --project-id p1 hint --asset image-abc-800x600-jpg --measured 300x200 --measured 640x200@1500

Settings are read from sanity-image.toml when present.
Run 'sanity-image gen-config' to generate a documented config file.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = config::CONFIG_FILENAME, global = true)]
    config: PathBuf,

    /// Project id (overrides config)
    #[arg(long, global = true)]
    project_id: Option<String>,

    /// Dataset (overrides config)
    #[arg(long, global = true)]
    dataset: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve one image variant
    Resolve {
        #[command(flatten)]
        image: ImageArgs,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Resolve every image in a JSON array file
    Batch {
        /// JSON file with an array of image objects
        file: PathBuf,

        /// Aspect ratio for entries without their own aspectRatio
        #[arg(long)]
        aspect_ratio: Option<f64>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show the sizes hint and object position for measured element sizes
    ///
    /// Measurements are debounced with the [sizing] quiet period; one hint is
    /// printed per settled size.
    Hint {
        #[command(flatten)]
        image: ImageArgs,

        /// Layout mode
        #[arg(long, value_enum, default_value = "block")]
        mode: ModeArg,

        /// Measured element size as WIDTHxHEIGHT[@MILLIS] in CSS pixels,
        /// optionally timestamped; repeat for a stream of measurements
        #[arg(long, required = true)]
        measured: Vec<Sample>,
    },
    /// Print a stock sanity-image.toml with all options documented
    GenConfig,
}

#[derive(clap::ValueEnum, Clone, Copy)]
enum ModeArg {
    Inline,
    Block,
    Fill,
}

impl From<ModeArg> for SizingMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Inline => SizingMode::Inline,
            ModeArg::Block => SizingMode::Block,
            ModeArg::Fill => SizingMode::Fill,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = || load_config(&cli.config, cli.project_id.as_deref(), cli.dataset.as_deref());

    match &cli.command {
        Command::Resolve { image, json } => {
            let (settings, project) = settings()?;
            let descriptor = image.descriptor();
            let resolved = resolve_with(&project, &descriptor, image.aspect_ratio, &settings.images)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&resolved)?);
            } else {
                output::print_resolved(&image.asset, &resolved);
            }
        }
        Command::Batch {
            file,
            aspect_ratio,
            json,
        } => {
            let (settings, project) = settings()?;
            let content = std::fs::read_to_string(file)?;
            let entries = parse_batch(&content)?;
            let cache = ResolveCache::with_options(settings.images);
            let results = resolve_batch(&project, &entries, *aspect_ratio, &cache);
            if *json {
                let reports: Vec<_> = results.iter().map(BatchResult::report).collect();
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                output::print_batch(&results, cache.stats());
            }
            if results.iter().any(|r| r.outcome.is_err()) {
                std::process::exit(1);
            }
        }
        Command::Hint {
            image,
            mode,
            measured,
        } => {
            let (settings, project) = settings()?;
            let descriptor = image.descriptor();
            let resolved = resolve_with(&project, &descriptor, image.aspect_ratio, &settings.images)?;
            let position = ObjectPosition::for_image(&descriptor);
            for size in debounce(measured.iter().copied(), settings.sizing.quiet_period()) {
                output::print_hint(&image.asset, &resolved, (*mode).into(), size, position);
            }
        }
        Command::GenConfig => print!("{}", config::stock_config_toml()),
    }

    Ok(())
}

/// Load the config file, apply CLI overrides on top, and derive the project.
fn load_config(
    path: &Path,
    project_id: Option<&str>,
    dataset: Option<&str>,
) -> Result<(ResolverConfig, ProjectDetails), config::ConfigError> {
    let mut config = config::load_config(path)?;
    if let Some(id) = project_id {
        config.project.project_id = id.to_string();
    }
    if let Some(dataset) = dataset {
        config.project.dataset = dataset.to_string();
    }
    config.validate()?;
    let project = config.project_details()?;
    Ok((config, project))
}

fn parse_fractions<const N: usize>(value: &str) -> Result<[f64; N], String> {
    let parts: Vec<f64> = value
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("{value:?}: {e}"))?;
    parts
        .try_into()
        .map_err(|_| format!("{value:?}: expected {N} comma-separated numbers"))
}

fn parse_crop(value: &str) -> Result<Crop, String> {
    let [left, right, top, bottom] = parse_fractions::<4>(value)?;
    Ok(Crop::new(left, right, top, bottom))
}

fn parse_hotspot(value: &str) -> Result<Hotspot, String> {
    let [x, y] = parse_fractions::<2>(value)?;
    Ok(Hotspot::at(x, y))
}
