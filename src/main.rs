//! Samegrid — click same-coloured neighbours to clear them; the rest falls into the gaps.

mod app;
mod game;
mod grid;
mod input;
mod logging;
mod theme;
mod ui;

use anyhow::Result;
use app::App;
use clap::{Parser, ValueEnum};
use game::Palette;
use std::time::Duration;
use thiserror::Error;

/// Slowest accepted tick interval.
const MAX_FRAME_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Settings fixed at startup. Built from [`Args`] and checked by [`GameConfig::validate`].
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub cell_size: u32,
    pub palette: Palette,
    pub seed: Option<u64>,
    /// Time between ticks, derived from `--frame-rate`.
    pub frame_interval: Duration,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("grid width and height must be at least 1 (got {width}x{height})")]
    EmptyGrid { width: u16, height: u16 },
    #[error("cell size must be at least 1")]
    ZeroCellSize,
    #[error("colour count must be between 1 and {max} (got {got})")]
    PaletteSize { got: usize, max: usize },
    #[error("board of {columns}x{rows} terminal cells does not fit a terminal")]
    BoardTooLarge { columns: u64, rows: u64 },
    #[error("frame rate must be a positive number of at most one tick per hour (got {0})")]
    FrameRate(f64),
}

impl GameConfig {
    pub fn validate(args: &Args) -> Result<Self, ConfigError> {
        if args.width == 0 || args.height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: args.width,
                height: args.height,
            });
        }
        if args.cell_size == 0 {
            return Err(ConfigError::ZeroCellSize);
        }
        let palette = Palette::new(args.colours).ok_or(ConfigError::PaletteSize {
            got: args.colours,
            max: Palette::MAX,
        })?;
        let (columns, rows) =
            ui::board_terminal_size(args.width as usize, args.height as usize, args.cell_size);
        if columns > u64::from(u16::MAX) || rows > u64::from(u16::MAX) {
            return Err(ConfigError::BoardTooLarge { columns, rows });
        }
        let frame_interval = Some(args.frame_rate)
            .filter(|rate| rate.is_finite() && *rate > 0.0)
            .and_then(|rate| Duration::try_from_secs_f64(1.0 / rate).ok())
            .filter(|interval| *interval <= MAX_FRAME_INTERVAL)
            .ok_or(ConfigError::FrameRate(args.frame_rate))?;
        Ok(Self {
            width: args.width as usize,
            height: args.height as usize,
            cell_size: u32::from(args.cell_size),
            palette,
            seed: args.seed,
            frame_interval,
        })
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = GameConfig::validate(&args)?;
    logging::init(args.log_file.as_deref(), &args.log_level)?;
    let theme = match theme::Theme::load(args.theme.as_deref(), args.scheme) {
        Ok(t) => t,
        Err(e) => {
            tracing::warn!(error = %e, "theme could not be loaded, using default");
            theme::Theme::default()
        }
    };
    tracing::info!(
        width = config.width,
        height = config.height,
        colours = config.palette.colours().len(),
        seed = ?config.seed,
        "starting"
    );
    let mut app = App::new(config, theme);
    app.run()?;
    Ok(())
}

/// Same-colour pair matching puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "samegrid",
    version,
    about = "Click a tile that has a same-coloured neighbour to clear the pair; tiles above fall into the gap.",
    long_about = "Samegrid is a small tile-matching puzzle for the terminal.\n\n\
        Clicking a tile clears it together with every orthogonal neighbour of the same colour. \
        Tiles above empty cells fall one row per frame. When no same-coloured neighbours are \
        left the round is won and the board is recoloured.\n\n\
        CONTROLS:\n  Left click  Clear pair    R          Recolour board\n  Q / Esc     Quit          Ctrl-C     Quit\n\n\
        Use --theme to load a btop-style theme (e.g. onedark.theme)."
)]
pub struct Args {
    /// Grid width in cells.
    #[arg(long, default_value = "10", value_name = "COLS")]
    pub width: u16,

    /// Grid height in cells.
    #[arg(long, default_value = "10", value_name = "ROWS")]
    pub height: u16,

    /// Cell size in board units (one unit is two terminal columns by one row).
    #[arg(long, default_value = "2", value_name = "UNITS")]
    pub cell_size: u16,

    /// Number of playable colours (1-5): red, green, blue, yellow, purple.
    #[arg(short, long, default_value = "5", value_name = "N")]
    pub colours: usize,

    /// Seed for the colour generator; a fixed seed replays the same boards.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Simulation ticks (and frames) per second. Cells fall one row per tick.
    #[arg(long, default_value = "60.0", value_name = "RATE")]
    pub frame_rate: f64,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses One Dark if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<std::path::PathBuf>,

    /// Colour scheme: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub scheme: Scheme,

    /// Write diagnostics to this file. Logging is off when not set.
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<std::path::PathBuf>,

    /// Log filter directive, e.g. `info` or `samegrid=debug`.
    #[arg(long, default_value = "info", value_name = "FILTER")]
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Scheme {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}
