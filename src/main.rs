//! imagenet-bench CLI
//!
//! Entry point for the classification benchmark, the single-pass scorer,
//! and the entry dependency-graph renderer.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use imagenet_bench::backend::{backend_name, default_device, DefaultBackend};
use imagenet_bench::config::{load_toml_config, HubConfig};
use imagenet_bench::graph::{draw, DirCatalog};
use imagenet_bench::inference::{run_classify, run_score, ClassifyParams, ScoreParams};
use imagenet_bench::model::{ImageClassifierConfig, ModelHub};
use imagenet_bench::utils::logging::{init_logging, LogConfig};
use imagenet_bench::DEFAULT_TOP_N;

/// Inference benchmarking for pretrained image classifiers, plus a
/// dependency-graph renderer for workflow entries.
#[derive(Parser, Debug)]
#[command(name = "imagenet-bench")]
#[command(version)]
#[command(about = "Image classification benchmarking and entry graph rendering", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, default_value = "false")]
    verbose: bool,

    /// Optional TOML file with hub settings (base URL, cache dir, retry)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the batched classification benchmark over validation images
    Classify {
        /// Directory holding the numbered validation images
        #[arg(short, long)]
        images_dir: PathBuf,

        /// Number of images to classify
        #[arg(short, long)]
        num_images: usize,

        /// Pretrained model name (e.g. resnet50)
        #[arg(short, long)]
        model: String,

        /// Output JSON file; persistence is skipped when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Execution device: cpu, gpu, or empty for auto-detection
        #[arg(short, long, default_value = "")]
        device: String,

        /// Maximum batch size
        #[arg(short, long, default_value = "32")]
        batch_size: usize,

        /// Number of retained predictions per image
        #[arg(short, long, default_value_t = DEFAULT_TOP_N)]
        top_n: usize,
    },

    /// Score every image in one forward pass (no batching, no top-N)
    Score {
        /// Directory holding the numbered validation images
        #[arg(short, long)]
        images_dir: PathBuf,

        /// Number of images to score
        #[arg(short, long)]
        num_images: usize,

        /// Pretrained model name (e.g. resnet50)
        #[arg(short, long)]
        model: String,

        /// Output JSON file; persistence is skipped when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Execution device: cpu, gpu, or empty for auto-detection
        #[arg(short, long, default_value = "")]
        device: String,
    },

    /// Render the dependency graph of a catalog entry
    Graph {
        /// Name of the target entry
        #[arg(short, long)]
        target: String,

        /// Catalog root directory (one subdirectory per entry)
        #[arg(short, long)]
        catalog_root: PathBuf,

        /// Directory the image and its source are written to
        #[arg(short, long)]
        dest_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = if cli.verbose {
        LogConfig::verbose()
    } else {
        LogConfig::default()
    };
    let _ = init_logging(&log_config);

    let hub_config: HubConfig = match &cli.config {
        Some(path) => load_toml_config(path)?,
        None => HubConfig::default(),
    };

    match cli.command {
        Commands::Classify {
            images_dir,
            num_images,
            model,
            output,
            device,
            batch_size,
            top_n,
        } => {
            info!("Backend: {}", backend_name());

            let params = ClassifyParams {
                images_dir,
                num_images,
                model_name: model,
                output_path: output,
                device_hint: device,
                max_batch_size: batch_size,
                top_n,
            };

            let hub = ModelHub::new(&hub_config);
            let tensor_device = default_device();
            run_classify::<DefaultBackend>(
                &params,
                &hub,
                &ImageClassifierConfig::new(),
                &tensor_device,
            )?;

            println!();
            println!("{}", "Benchmark complete!".green().bold());
        }

        Commands::Score {
            images_dir,
            num_images,
            model,
            output,
            device,
        } => {
            info!("Backend: {}", backend_name());

            let params = ScoreParams {
                images_dir,
                num_images,
                model_name: model,
                output_path: output,
                device_hint: device,
            };

            let hub = ModelHub::new(&hub_config);
            let tensor_device = default_device();
            run_score::<DefaultBackend>(
                &params,
                &hub,
                &ImageClassifierConfig::new(),
                &tensor_device,
            )?;
        }

        Commands::Graph {
            target,
            catalog_root,
            dest_dir,
        } => {
            let catalog = DirCatalog::new(&catalog_root);

            match draw(&catalog, &target, &dest_dir) {
                Ok(outcome) => {
                    println!("{}", "Graph is generated!".green().bold());
                    println!("  Source: {}", outcome.dot_path.display());
                    println!("  Image:  {}", outcome.svg_path.display());
                }
                Err(imagenet_bench::Error::EntryNotFound(name)) => {
                    println!(
                        "{} Provide a correct entry name: '{}' does not resolve",
                        "Error:".red(),
                        name
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}
