use asset_dims::asset::AssetFile;
use asset_dims::imaging::{self, Dimension, ImageDimensions, TransformResolver};
use asset_dims::{batch, config, logging, output, paths};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Shared flags for commands that can apply a named transform.
#[derive(clap::Args, Clone)]
struct TransformArgs {
    /// Transform handle from the [transforms] config tables
    #[arg(long, short = 't')]
    transform: Option<String>,
}

#[derive(Parser)]
#[command(name = "asset-dims")]
#[command(about = "Displayed sizes and thumbnails for CMS media assets")]
#[command(long_about = "\
Displayed sizes and thumbnails for CMS media assets

Transforms are named resize policies defined in config.toml:

  [transforms.thumb]
  mode = \"scaleAndCrop\"     # stretchToFit | scaleToFit | scaleAndCrop
  width = 200
  height = 200

Folder layout:

  <base>/
  └── config/
      └── config.toml

Run 'asset-dims gen-config' to print a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Base folder
    #[arg(long, global = true)]
    base_path: Option<PathBuf>,

    /// Config folder (default: <base>/config)
    #[arg(long, global = true)]
    config_path: Option<PathBuf>,

    /// Environment name used to pick [environments.*] overrides
    #[arg(long, env = "ASSET_DIMS_ENV", default_value = "", global = true)]
    environment: String,

    /// Debug-level diagnostics regardless of config
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Displayed size of an image, e.g. `size 4000x2000 -t thumb`
    Size {
        /// Original size as WIDTHxHEIGHT
        original: ImageDimensions,
        #[command(flatten)]
        transform: TransformArgs,
    },
    /// One displayed dimension (width or height) of an image
    Dimension {
        /// width or height
        dimension: Dimension,
        /// Original size as WIDTHxHEIGHT
        original: ImageDimensions,
        #[command(flatten)]
        transform: TransformArgs,
    },
    /// Thumbnail size and URLs for an image, as JSON
    Thumb {
        /// Original size as WIDTHxHEIGHT
        original: ImageDimensions,
        /// Bounding box as WIDTHxHEIGHT (default: [thumbnails] config)
        #[arg(long)]
        max: Option<ImageDimensions>,
        /// Asset id used in the thumbnail URL
        #[arg(long, default_value_t = 0)]
        id: u64,
    },
    /// List configured transforms
    Transforms,
    /// Evaluate every asset in a JSON asset list
    Batch {
        /// JSON file holding an array of asset records
        assets: PathBuf,
        #[command(flatten)]
        transform: TransformArgs,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let log = logging::init(cli.debug);
    let app_paths = paths::AppPaths::resolve(cli.base_path.as_deref(), cli.config_path.as_deref())?;
    let site_config = config::load_config(&app_paths.config, &cli.environment)?;
    if site_config.general.dev_mode {
        log.enable_debug();
    }
    tracing::debug!(
        config = %app_paths.config.display(),
        environment = %cli.environment,
        transforms = site_config.transforms.len(),
        "config loaded"
    );
    let registry = site_config.transform_registry();

    match cli.command {
        Command::Size {
            original,
            transform,
        } => {
            let transform = lookup(&registry, transform.transform.as_deref())?;
            let size = imaging::compute_size(original, transform.as_ref())?;
            println!("{size}");
        }
        Command::Dimension {
            dimension,
            original,
            transform,
        } => {
            let transform = lookup(&registry, transform.transform.as_deref())?;
            let value = imaging::compute_dimension(original, dimension, transform.as_ref())?;
            println!("{value}");
        }
        Command::Thumb { original, max, id } => {
            let max = max.unwrap_or(ImageDimensions {
                width: site_config.thumbnails.max_width,
                height: site_config.thumbnails.max_height,
            });
            let asset = AssetFile::image(id, String::new(), original.width, original.height);
            let data = asset.thumb_data(max.width, max.height, &site_config.urls.resource_base)?;
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Command::Transforms => {
            output::print_transforms(&registry);
        }
        Command::Batch { assets, transform } => {
            init_thread_pool(&site_config.processing);
            let list = batch::load_assets(&assets)?;
            let entries = batch::run(list, transform.transform.as_deref(), &site_config, &registry);
            output::print_batch(&entries);
        }
        Command::GenConfig => unreachable!("handled before bootstrap"),
    }

    Ok(())
}

/// Resolve an optional handle; an empty handle means no transform.
fn lookup(
    resolver: &impl TransformResolver,
    handle: Option<&str>,
) -> Result<Option<imaging::TransformDescriptor>, imaging::DimensionError> {
    handle
        .filter(|h| !h.is_empty())
        .map(|h| resolver.resolve(h))
        .transpose()
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
