//! Game state: grid colouring, pair matching, gravity, round detection and the per-tick loop.

use crate::GameConfig;
use crate::grid::{Cell, Colour, Grid};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

static PLAYABLE: [Colour; 5] = Colour::PLAYABLE;

/// Active playable colours: a prefix of `Colour::PLAYABLE`, never empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    colours: &'static [Colour],
}

impl Palette {
    pub const MAX: usize = Colour::PLAYABLE.len();

    /// Palette of the first `size` playable colours; `None` unless `1 <= size <= MAX`.
    pub fn new(size: usize) -> Option<Self> {
        (1..=Self::MAX).contains(&size).then(|| Self {
            colours: &PLAYABLE[..size],
        })
    }

    #[inline]
    pub fn colours(&self) -> &'static [Colour] {
        self.colours
    }

    /// Uniform draw over exactly the palette's colours.
    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Colour {
        self.colours[rng.random_range(0..self.colours.len())]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colours: &PLAYABLE,
        }
    }
}

/// Give every cell an independent uniform colour from `palette`. No cell is left `Empty`.
pub fn assign_colours<R: Rng + ?Sized>(grid: &mut Grid, palette: Palette, rng: &mut R) {
    for cell in grid.iter_mut() {
        cell.colour = palette.sample(rng);
    }
}

/// Clear the clicked cell together with every orthogonal neighbour of the same colour.
///
/// Each neighbour is compared against the clicked cell's colour as it was before
/// this call, so clearing one pair does not affect the next comparison.
/// Returns how many neighbours matched. Empty or out-of-range origins do nothing.
pub fn check_neighbours(grid: &mut Grid, index: usize) -> usize {
    let origin = match grid.colour(index) {
        Some(c) if !c.is_empty() => c,
        _ => return 0,
    };
    let targets: Vec<usize> = grid
        .neighbours(index)
        .filter(|&n| grid.colour(n) == Some(origin))
        .collect();
    for &n in &targets {
        grid.set_colour(index, Colour::Empty);
        grid.set_colour(n, Colour::Empty);
    }
    targets.len()
}

/// One gravity step: every non-empty cell with an empty cell directly below falls one row.
///
/// Rows are scanned bottom-up, so a cell that just fell is never visited again in
/// the same pass. Returns whether anything moved.
pub fn settle(grid: &mut Grid) -> bool {
    let (width, height) = (grid.width(), grid.height());
    let mut moved = false;
    for row in (0..height.saturating_sub(1)).rev() {
        for column in 0..width {
            let falls = matches!(grid.colour_at(column, row), Some(c) if !c.is_empty())
                && grid.colour_at(column, row + 1) == Some(Colour::Empty);
            if let (true, Some(here), Some(below)) =
                (falls, grid.index_of(column, row), grid.index_of(column, row + 1))
            {
                grid.swap_colours(here, below);
                moved = true;
            }
        }
    }
    moved
}

/// True if any two orthogonally adjacent non-empty cells share a colour.
pub fn has_matches(grid: &Grid) -> bool {
    grid.cells().iter().enumerate().any(|(i, cell)| {
        !cell.colour.is_empty()
            && grid
                .neighbours(i)
                .any(|n| grid.colour(n) == Some(cell.colour))
    })
}

/// Input polled for one tick: at most one click and one reset request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Pointer position in board units, origin at the board's top-left.
    pub click: Option<(i64, i64)>,
    pub reset: bool,
}

/// Something worth reporting that happened during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    Matched {
        column: usize,
        row: usize,
        colour: Colour,
        pairs: usize,
    },
    Reset,
    /// No pairs left after the player cleared at least one; the grid was recoloured.
    RoundWon { round: u32 },
    /// Fresh colouring had no pairs at all; recoloured without counting a round.
    Reshuffled,
}

/// Game state: owns the grid, the palette and the random source.
#[derive(Debug)]
pub struct GameState {
    pub grid: Grid,
    palette: Palette,
    rng: StdRng,
    pub rounds_won: u32,
    pub resets: u32,
    /// Pairs cleared since the grid was last recoloured.
    pub pairs_this_round: u32,
    pub last_event: Option<TickEvent>,
}

impl GameState {
    pub fn new(config: &GameConfig) -> Self {
        let rng = config
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        let grid = Grid::initialise(config.height, config.width, config.cell_size);
        tracing::debug!(cells = grid.cell_count(), "grid initialised");
        Self::with_grid(grid, config.palette, rng)
    }

    /// Start from `grid` and colour it. Used by `new` and by tests that need a seeded game.
    pub fn with_grid(grid: Grid, palette: Palette, rng: StdRng) -> Self {
        let mut state = Self {
            grid,
            palette,
            rng,
            rounds_won: 0,
            resets: 0,
            pairs_this_round: 0,
            last_event: None,
        };
        state.recolour();
        state
    }

    #[inline]
    pub fn palette(&self) -> Palette {
        self.palette
    }

    fn recolour(&mut self) {
        assign_colours(&mut self.grid, self.palette, &mut self.rng);
        self.pairs_this_round = 0;
    }

    /// First half of a tick: apply the click (if it lands on a cell), then the reset request.
    pub fn apply_input(&mut self, input: TickInput) -> Vec<TickEvent> {
        let mut events = Vec::new();
        if let Some((x, y)) = input.click {
            let hit = self.grid.cell_at(x, y).and_then(|i| Some((i, *self.grid.get(i)?)));
            if let Some((index, Cell { column, row, colour })) = hit {
                let pairs = check_neighbours(&mut self.grid, index);
                if pairs > 0 {
                    self.pairs_this_round += pairs as u32;
                    tracing::debug!(column, row, colour = colour.name(), pairs, "cells matched");
                    events.push(TickEvent::Matched {
                        column,
                        row,
                        colour,
                        pairs,
                    });
                }
            }
        }
        if input.reset {
            self.recolour();
            self.resets = self.resets.saturating_add(1);
            tracing::info!(resets = self.resets, "resetting colours");
            events.push(TickEvent::Reset);
        }
        if let Some(&last) = events.last() {
            self.last_event = Some(last);
        }
        events
    }

    /// Second half of a tick, after rendering: one gravity step, then the round check.
    pub fn advance(&mut self) -> Option<TickEvent> {
        settle(&mut self.grid);
        if has_matches(&self.grid) {
            return None;
        }
        let event = if self.pairs_this_round > 0 {
            self.rounds_won = self.rounds_won.saturating_add(1);
            tracing::info!(round = self.rounds_won, pairs = self.pairs_this_round, "round won");
            TickEvent::RoundWon {
                round: self.rounds_won,
            }
        } else {
            tracing::info!("no pairs on the board, reshuffling");
            TickEvent::Reshuffled
        };
        self.recolour();
        self.last_event = Some(event);
        Some(event)
    }

    /// Whole tick without a render in between.
    #[cfg(test)]
    pub fn tick(&mut self, input: TickInput) -> Vec<TickEvent> {
        let mut events = self.apply_input(input);
        events.extend(self.advance());
        events
    }
}
