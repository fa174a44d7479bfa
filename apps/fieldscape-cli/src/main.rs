use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use fieldscape_kernel::{FieldKernel, KernelConfig};
use fieldscape_render::{DebugTextRenderer, RenderView, Renderer};
use fieldscape_scene::{FrameClock, Scene, SceneConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fieldscape-cli", about = "Sample the field kernel from the command line")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Kernel constants (YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print versions and the active kernel constants
    Info,
    /// Sample the terrain height field
    Height {
        #[arg(long, allow_negative_numbers = true)]
        x: f32,
        #[arg(long, allow_negative_numbers = true)]
        z: f32,
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        t: f32,
        /// Use the single-term approximation
        #[arg(long)]
        fast: bool,
    },
    /// Sample one particle on the spiral
    Spiral {
        #[arg(long)]
        index: usize,
        #[arg(long, default_value = "150")]
        count: usize,
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        t: f32,
    },
    /// Sample the three color channels at one coordinate
    Color {
        #[arg(long, allow_negative_numbers = true)]
        coord: f32,
    },
    /// Sample 1D value noise
    Noise {
        #[arg(long, allow_negative_numbers = true)]
        x: f32,
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        seed: f32,
    },
    /// Drive a headless scene with a fixed time step
    Frames {
        /// Number of frames to update
        #[arg(short, long, default_value = "3")]
        count: u64,
        /// Seconds per frame
        #[arg(long, default_value = "0.016666668")]
        dt: f32,
        /// Number of spiral particles
        #[arg(long, default_value = "150")]
        particles: usize,
        /// Print one JSON summary per frame instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print kernel constants as YAML
    Config {
        /// Validate and print this file instead of the defaults
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<KernelConfig> {
    match path {
        Some(path) => {
            KernelConfig::load(path).with_context(|| format!("loading {}", path.display()))
        }
        None => Ok(KernelConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_ref())?;
    let kernel = FieldKernel::new(config)?;

    match cli.command {
        Commands::Info => {
            println!("fieldscape-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("scene: {}", fieldscape_scene::crate_info());
            println!("render: {}", fieldscape_render::crate_info());
            println!("height envelope: ±{}", kernel.height_envelope());
            print!("{}", kernel.config().to_yaml()?);
        }
        Commands::Height { x, z, t, fast } => {
            let h = if fast {
                kernel.fast_height(x, z, t)
            } else {
                kernel.height(x, z, t)
            };
            println!("height({x}, {z}, {t}) = {h:.6}");
        }
        Commands::Spiral { index, count, t } => {
            let p = kernel.spiral_position(index, count, t)?;
            println!(
                "spiral({index}/{count}, {t}) = ({:.6}, {:.6}, {:.6})",
                p.x, p.y, p.z
            );
        }
        Commands::Color { coord } => {
            println!(
                "color({coord}) = r {:.6} g {:.6} b {:.6}",
                kernel.color_r(coord),
                kernel.color_g(coord),
                kernel.color_b(coord)
            );
        }
        Commands::Noise { x, seed } => {
            println!("noise({x}, seed {seed}) = {:.6}", kernel.value_noise(x, seed));
        }
        Commands::Frames {
            count,
            dt,
            particles,
            json,
        } => {
            let scene_config = SceneConfig {
                particle_count: particles,
                ..SceneConfig::default()
            };
            let mut scene = Scene::new(&kernel, &scene_config)?;
            let mut clock = FrameClock::new();
            let renderer = DebugTextRenderer::new();
            let view = RenderView::default();

            for _ in 0..count {
                scene.update(&kernel, clock.elapsed())?;
                if json {
                    println!("{}", serde_json::to_string(&scene.summary())?);
                } else {
                    print!("{}", renderer.render(&scene, &view));
                }
                clock.advance(dt);
            }

            let timer = scene.timer();
            tracing::info!(
                frames = count,
                avg_us = timer.average().as_micros() as u64,
                max_us = timer.max().as_micros() as u64,
                "headless run complete"
            );
        }
        Commands::Config { path } => {
            let config = match path {
                Some(path) => load_config(Some(&path))?,
                None => *kernel.config(),
            };
            print!("{}", config.to_yaml()?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_negative_coordinates() {
        let cli = Cli::try_parse_from(["fieldscape-cli", "height", "--x", "-1.5", "--z", "2"]).unwrap();
        match cli.command {
            Commands::Height { x, z, t, fast } => {
                assert_eq!(x, -1.5);
                assert_eq!(z, 2.0);
                assert_eq!(t, 0.0);
                assert!(!fast);
            }
            _ => panic!("expected height"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["fieldscape-cli", "frames", "--json", "--verbose"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Frames { json: true, count: 3, .. }));
    }

    #[test]
    fn default_config_loads() {
        assert_eq!(load_config(None).unwrap(), KernelConfig::default());
    }
}
