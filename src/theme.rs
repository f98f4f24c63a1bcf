//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use crate::Scheme;
use crate::grid::Colour;
use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Tile colours and UI colours, One Dark by default.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Tile colours in palette order: red, green, blue, yellow, purple.
    pub tiles: [Color; 5],
    /// Empty cells.
    pub empty: Color,
    /// Board border and separators.
    pub div_line: Color,
    /// Status text.
    pub main_fg: Color,
    /// Titles and highlighted counters.
    pub title: Color,
    /// Key hints.
    pub inactive_fg: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self::onedark_default()
    }
}

const fn rgb(hex: u32) -> Color {
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

const ONEDARK_TILES: [Color; 5] = [
    rgb(0xE0_6C_75), // cpu_end / red
    rgb(0x98_C3_79), // mem_box / green
    rgb(0x61_AF_EF), // cpu_box / blue
    rgb(0xE5_C0_7B), // title / yellow
    rgb(0xC6_78_DD), // net_box / purple
];

impl Theme {
    /// Hardcoded One Dark defaults (hex values from onedark.theme).
    pub fn onedark_default() -> Self {
        Self {
            tiles: ONEDARK_TILES,
            empty: rgb(0x31_35_3F),       // meter_bg
            div_line: rgb(0x3F_44_4F),    // div_line
            main_fg: rgb(0xAB_B2_BF),     // main_fg
            title: rgb(0xE5_C0_7B),       // title
            inactive_fg: rgb(0x5C_63_70), // inactive_fg
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// No path, or a path that does not exist, gives the One Dark defaults.
    pub fn load(path: Option<&Path>, scheme: Scheme) -> Result<Self, ThemeError> {
        let mut theme = match path {
            Some(p) if p.exists() => {
                let s = std::fs::read_to_string(p)?;
                Self::from_map(&parse_theme_file(&s))?
            }
            _ => Self::onedark_default(),
        };
        theme.apply_scheme(scheme);
        Ok(theme)
    }

    /// Override tile colours for high-contrast or colorblind play.
    pub fn apply_scheme(&mut self, scheme: Scheme) {
        match scheme {
            Scheme::Normal => {}
            Scheme::HighContrast => {
                self.tiles = [
                    rgb(0xFF_00_00), // red
                    rgb(0x00_FF_00), // green
                    rgb(0x00_88_FF), // blue
                    rgb(0xFF_FF_00), // yellow
                    rgb(0xFF_00_FF), // magenta
                ];
            }
            Scheme::Colorblind => {
                // Paul Tol's vibrant set: no red/green pair carries meaning alone.
                self.tiles = [
                    rgb(0xCC_33_11), // red
                    rgb(0x00_99_88), // teal
                    rgb(0x00_77_BB), // blue
                    rgb(0xEE_77_33), // orange
                    rgb(0xEE_33_77), // magenta
                ];
            }
        }
    }

    /// Keys match onedark.theme. Missing keys keep the One Dark value; present but
    /// malformed values are an error.
    fn from_map(map: &HashMap<String, String>) -> Result<Self, ThemeError> {
        let get = |keys: &[&str], fallback: Color| -> Result<Color, ThemeError> {
            keys.iter()
                .find_map(|k| map.get(*k))
                .map_or(Ok(fallback), |v| parse_hex(v))
        };
        let d = Self::onedark_default();
        Ok(Self {
            tiles: [
                get(&["cpu_end", "temp_end"], d.tiles[0])?,
                get(&["mem_box", "cpu_start"], d.tiles[1])?,
                get(&["cpu_box"], d.tiles[2])?,
                get(&["title", "cpu_mid"], d.tiles[3])?,
                get(&["net_box"], d.tiles[4])?,
            ],
            empty: get(&["meter_bg"], d.empty)?,
            div_line: get(&["div_line"], d.div_line)?,
            main_fg: get(&["main_fg"], d.main_fg)?,
            title: get(&["title"], d.title)?,
            inactive_fg: get(&["inactive_fg"], d.inactive_fg)?,
        })
    }

    /// Display colour for a cell.
    #[inline]
    pub fn colour(&self, colour: Colour) -> Color {
        colour
            .theme_index()
            .map_or(self.empty, |i| self.tiles[i % self.tiles.len()])
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(stripped) = line.strip_prefix("theme[") else {
            continue;
        };
        let Some(end) = stripped.find(']') else {
            continue;
        };
        let key = stripped[..end].trim();
        let rest = stripped[end + 1..].trim();
        if let Some(value) = rest.strip_prefix('=') {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !value.is_empty() {
                map.insert(key.to_string(), value.to_string());
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let digits = s.trim().trim_start_matches('#');
    let invalid = || ThemeError::InvalidHex(s.trim().to_string());
    let channel = |range: std::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|d| u8::from_str_radix(d, 16).ok())
            .ok_or_else(invalid)
    };
    match digits.len() {
        6 => Ok(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        3 => Ok(Color::Rgb(
            channel(0..1)? * 17,
            channel(1..2)? * 17,
            channel(2..3)? * 17,
        )),
        _ => Err(invalid()),
    }
}
