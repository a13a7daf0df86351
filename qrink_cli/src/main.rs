use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use image::Rgba;

use qrink_core::{ModuleGrid, RenderStyle};
use qrink_raster::{AsciiRenderer, Logo, LogoComposer, Rasterizer};

#[derive(Parser)]
#[command(name = "qrink_cli")]
#[command(version)]
#[command(propagate_version = true)]
#[command(about = "Render encoded QR module grids into styled images", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(flatten_help = true)]
    Render {
        #[arg(
            help = "Grid file or stdin if unspecified",
            long_help = "Grid file or stdin if unspecified. The grid is the textual module matrix \
            produced by a QR encoder: one row per line, '#'/'1' for dark modules, '.'/'0'/' ' for \
            light ones."
        )]
        grid: Option<PathBuf>,
        #[arg(short, long, default_value = "qr.png", help = "Output PNG file")]
        output: PathBuf,
        #[arg(
            short,
            long,
            default_value = "square",
            value_parser = RenderStyle::from_str,
            help = "Module style: square, dots or rounded"
        )]
        style: RenderStyle,
        #[arg(long, default_value_t = 600, help = "Surface side in pixels")]
        size: u32,
        #[arg(long, default_value_t = 40, help = "Margin around the grid in pixels")]
        margin: u32,
        #[arg(long, help = "Logo image to composite at the center")]
        logo: Option<PathBuf>,
        #[arg(long, default_value_t = 120, help = "Logo side in pixels")]
        logo_size: u32,
        #[arg(long, default_value_t = 10, help = "White halo padding around the logo in pixels")]
        logo_padding: u32,
        #[arg(
            long,
            default_value = "#000000",
            value_parser = parse_color,
            help = "Module color as #RRGGBB"
        )]
        dark: Rgba<u8>,
        #[arg(
            long,
            default_value = "#ffffff",
            value_parser = parse_color,
            help = "Background color as #RRGGBB"
        )]
        light: Rgba<u8>,
    },
    Preview {
        #[arg(help = "Grid file or stdin if unspecified")]
        grid: Option<PathBuf>,
    },
}

fn parse_color(text: &str) -> Result<Rgba<u8>, String> {
    let hex = text.strip_prefix('#').unwrap_or(text);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("invalid color '{}', expected #RRGGBB", text));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|err| err.to_string())
    };
    Ok(Rgba([channel(0..2)?, channel(2..4)?, channel(4..6)?, 255]))
}

fn read_grid(path: Option<PathBuf>) -> Result<ModuleGrid> {
    let mut text = String::new();
    match path {
        Some(path) => {
            std::fs::File::open(&path)
                .with_context(|| format!("cannot open grid file '{}'", path.display()))?
                .read_to_string(&mut text)?;
        }
        None => {
            std::io::stdin().read_to_string(&mut text)?;
        }
    }
    Ok(ModuleGrid::parse(&text)?)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    match cli.command {
        Command::Render {
            grid,
            output,
            style,
            size,
            margin,
            logo,
            logo_size,
            logo_padding,
            dark,
            light,
        } => {
            // Before doing anything, make sure the requested output is valid.
            if output.extension().and_then(|ext| ext.to_str()) != Some("png") {
                bail!("output '{}' must have a .png extension", output.display());
            }
            let grid = read_grid(grid)?;
            if grid.size() == 0 {
                tracing::info!("empty grid, nothing to render");
                return Ok(());
            }
            let rasterizer = Rasterizer::new()
                .with_style(style)
                .with_size(size)
                .with_margin(margin)
                .with_dark_color(dark)
                .with_light_color(light);
            let mut surface = rasterizer.render(&grid)?;
            if let Some(path) = logo {
                // A logo that cannot be loaded or placed degrades to a
                // grid-only image instead of failing the render.
                match Logo::load(&path).await {
                    Ok(logo) => {
                        let composer = LogoComposer::new()
                            .with_logo_size(logo_size)
                            .with_padding(logo_padding);
                        if let Err(err) = composer.composite(&mut surface, &logo) {
                            tracing::warn!("skipping logo: {}", err);
                        }
                    }
                    Err(err) => {
                        tracing::warn!("skipping logo '{}': {}", path.display(), err);
                    }
                }
            }
            surface
                .save_png(&output)
                .with_context(|| format!("cannot write '{}'", output.display()))?;
            println!("wrote {}", output.display());
        }
        Command::Preview { grid } => {
            let grid = read_grid(grid)?;
            let stdout = std::io::stdout();
            AsciiRenderer::new().render(&mut stdout.lock(), &grid)?;
        }
    }
    Ok(())
}
