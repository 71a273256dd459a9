use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use code_explainer::config::{AppConfig, Quality};
use code_explainer::context::{CheckContext, RenderContext};
use code_explainer::geometry::Frame;
use code_explainer::renderer::FrameFormat;
use code_explainer::scene::{build, scene_by_name, AsyncProcessingExplanation, SCENE_NAMES};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "code-explainer")]
#[command(about = "Animated code walkthrough renderer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a scene to frames and encode it with ffmpeg
    Render {
        /// Scene to render
        #[arg(default_value = AsyncProcessingExplanation::NAME)]
        scene: String,

        /// Quality preset
        #[arg(short, long, value_enum)]
        quality: Option<Quality>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Frame file format
        #[arg(long, value_enum)]
        format: Option<FrameFormat>,

        /// Keep the frames, skip video encoding
        #[arg(long)]
        no_encode: bool,
    },
    /// Print the step list of a scene
    Timeline {
        #[arg(default_value = AsyncProcessingExplanation::NAME)]
        scene: String,

        /// Emit the steps as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check highlight targets, narration pacing and the stage
    Check {
        #[arg(default_value = AsyncProcessingExplanation::NAME)]
        scene: String,
    },
    /// List available scenes
    List,
    /// Print the effective configuration
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("failed to load configuration")?;

    match cli.command {
        Commands::Render {
            scene,
            quality,
            output,
            format,
            no_encode,
        } => {
            // Command-line flags win over the config file
            let mut render = config.render.clone();
            if let Some(quality) = quality {
                render.quality = quality;
            }
            if let Some(format) = format {
                render.format = format;
            }
            let output_dir = output.unwrap_or_else(|| render.output_dir.clone());
            let mut encode = config.encode.clone();
            encode.enabled &= !no_encode;

            println!("🎬 Code Explainer\n");
            let settings = render.settings()?;
            RenderContext::run(&scene, &settings, &output_dir, render.format, &encode)?;
        }
        Commands::Timeline { scene, json } => {
            let mut scene = scene_by_name(&scene)?;
            let timeline = build(scene.as_mut(), Frame::default())?;
            if json {
                println!("{}", timeline.to_json()?);
            } else {
                println!("📋 {}", scene.name());
                println!("{}", timeline.summarize());
                println!("Fingerprint: {}", timeline.fingerprint()?);
            }
        }
        Commands::Check { scene } => {
            let report = CheckContext::run(&scene)?;
            if !report.passed() {
                eprintln!("\n❌ Check failed for {}", report.scene);
                std::process::exit(1);
            }
            println!("\n✅ Check passed for {}", report.scene);
        }
        Commands::List => {
            for name in SCENE_NAMES {
                println!("{}", name);
            }
        }
        Commands::Config => {
            print!("{}", toml::to_string(&config)?);
        }
    }

    Ok(())
}
