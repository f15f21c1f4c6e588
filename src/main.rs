//! Fractal Tree - command-line host
//!
//! CLI commands:
//! - render: Build the tree and write SVG/PNG/JSON
//! - replay: Apply a gesture script to the view, then render
//! - inspect: Print parameters, path statistics and the visible region
//! - init-config: Write the default configuration file

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use fractal_tree::config::{Config, Environment};
use fractal_tree::replay::GestureScript;
use fractal_tree::{logging, render, render_pass};

#[derive(Parser)]
#[command(name = "fractal_tree")]
#[command(about = "Recursive binary tree fractal with a pan/zoom view")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the YAML config (falls back to FRACTAL_TREE_CONFIG, then fractal_tree.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the tree and write it to a file
    Render {
        /// Output file (.svg, .png or .json)
        #[arg(short, long, default_value = "tree.svg")]
        output: PathBuf,

        /// Override the recursion depth
        #[arg(short, long)]
        depth: Option<u32>,

        /// Override the viewport width
        #[arg(long)]
        width: Option<f64>,

        /// Override the viewport height
        #[arg(long)]
        height: Option<f64>,
    },

    /// Replay a gesture script on the configured view, then render
    Replay {
        /// Script file (.yaml or .json)
        #[arg(short, long)]
        script: PathBuf,

        /// Output file (.svg, .png or .json)
        #[arg(short, long, default_value = "tree.svg")]
        output: PathBuf,
    },

    /// Print parameters, path statistics and the visible region
    Inspect,

    /// Write the default configuration
    InitConfig {
        #[arg(short, long, default_value = "fractal_tree.yaml")]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let env = Environment::load();
    let _log_guard = logging::init_logging(env.log_dir.as_deref())?;
    tracing::info!("Fractal Tree starting up");

    let cli = Cli::parse();
    let config_path = cli
        .config
        .or(env.config_path)
        .unwrap_or_else(|| PathBuf::from("fractal_tree.yaml"));
    tracing::debug!("CLI args parsed: config={:?}", config_path);

    match cli.command {
        Commands::Render {
            output,
            depth,
            width,
            height,
        } => {
            let mut config = load_config(&config_path)?;
            if let Some(depth) = depth {
                config.fractal.depth = depth;
            }
            if let Some(width) = width {
                config.view.width = width;
            }
            if let Some(height) = height {
                config.view.height = height;
            }
            config.validate()?;
            render_to(&config, None, &output)?;
        }

        Commands::Replay { script, output } => {
            let config = load_config(&config_path)?;
            let script = GestureScript::load(&script)?;
            render_to(&config, Some(&script), &output)?;
        }

        Commands::Inspect => inspect(&load_config(&config_path)?)?,

        Commands::InitConfig { output } => {
            Config::default().save(&output)?;
            println!("Wrote default config to {:?}", output);
        }
    }

    Ok(())
}

/// Load the config file, or defaults when it does not exist
fn load_config(path: &Path) -> anyhow::Result<Config> {
    if path.exists() {
        tracing::info!("Loading config from {:?}", path);
        Ok(Config::load(path)?)
    } else {
        tracing::warn!("Config file not found: {:?}, using defaults", path);
        Ok(Config::default())
    }
}

fn render_to(config: &Config, script: Option<&GestureScript>, output: &Path) -> anyhow::Result<()> {
    let mut view = config.view.to_transform()?;

    if let Some(script) = script {
        let summary = script.apply(&config.controller(), &mut view);
        println!(
            "Replayed {} steps ({} ignored)",
            summary.applied + summary.ignored,
            summary.ignored
        );
    }

    let screen = render_pass(&config.fractal, &view);
    render::write_screen_path(&screen, &config.render, output)?;

    println!(
        "Wrote {} segments to {:?} (scale {:.3} x {:.3}, center ({:.3}, {:.3}))",
        screen.path.segment_count(),
        output,
        view.scale_x(),
        view.scale_y(),
        view.center().x,
        view.center().y
    );
    Ok(())
}

fn inspect(config: &Config) -> anyhow::Result<()> {
    let view = config.view.to_transform()?;
    let path = fractal_tree::build_fractal_path(&config.fractal);
    let params = &config.fractal;

    println!("Fractal parameters:");
    println!("  initial_length: {}", params.initial_length);
    println!("  length_factor:  {}", params.length_factor);
    println!("  angle_left:     {:.4} rad ({:.1} deg)", params.angle_left, params.angle_left.to_degrees());
    println!("  angle_right:    {:.4} rad ({:.1} deg)", params.angle_right, params.angle_right.to_degrees());
    println!("  depth:          {}", params.effective_depth());
    println!();
    println!("Path:");
    println!("  segments:  {}", path.segment_count());
    println!("  sub-paths: {}", path.subpaths().len());
    if let Some(bounds) = path.bounds() {
        // Turtle space is Y-down; report in view (Y-up) coordinates
        println!(
            "  bounds:    x [{:.4}, {:.4}], y [{:.4}, {:.4}]",
            bounds.min_x(),
            bounds.max_x(),
            -bounds.max_y(),
            -bounds.min_y()
        );
    }
    println!();

    let region = view.visible_region();
    println!("View:");
    println!("  scale:   {} x {}", view.scale_x(), view.scale_y());
    println!("  center:  ({}, {})", view.center().x, view.center().y);
    println!(
        "  visible: x [{:.4}, {:.4}], y [{:.4}, {:.4}]",
        region.min_x(),
        region.max_x(),
        region.origin.y - region.size.height,
        region.origin.y
    );

    Ok(())
}
