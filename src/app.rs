//! App: terminal init, main loop, input polling and per-tick simulation.

use crate::GameConfig;
use crate::game::{GameState, TickInput};
use crate::input::{Action, event_to_action};
use crate::theme::Theme;
use anyhow::Result;
use crossterm::event;
use ratatui::DefaultTerminal;
use ratatui::layout::Rect;
use std::time::{Duration, Instant};

pub struct App {
    theme: Theme,
    state: GameState,
    frame_interval: Duration,
    /// Board rect from the last draw; clicks are resolved against what the player saw.
    board: Rect,
}

/// Input gathered while waiting for the next frame.
#[derive(Debug, Default)]
struct Polled {
    input: TickInput,
    quit: bool,
}

impl Polled {
    /// Keep the first click and any reset; later clicks within the same frame are dropped.
    fn record(&mut self, action: Action, board: Rect) {
        match action {
            Action::Click { column, row } if self.input.click.is_none() => {
                self.input.click = Some(crate::ui::terminal_to_board(board, column, row));
            }
            Action::Reset => self.input.reset = true,
            Action::Quit => self.quit = true,
            Action::Click { .. } | Action::None => {}
        }
    }
}

impl App {
    pub fn new(config: GameConfig, theme: Theme) -> Self {
        Self {
            theme,
            state: GameState::new(&config),
            frame_interval: config.frame_interval,
            board: Rect::default(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{DisableMouseCapture, EnableMouseCapture},
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        tracing::info!("terminal session started");

        let result = ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))
            .map_err(anyhow::Error::from)
            .and_then(|mut terminal| self.run_loop(&mut terminal));

        // Restore
        let _ = execute!(std::io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        disable_raw_mode()?;
        tracing::info!(rounds_won = self.state.rounds_won, resets = self.state.resets, "terminal session ended");

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let mut next_frame = Instant::now();
        loop {
            next_frame += self.frame_interval;
            let polled = self.poll_until(next_frame)?;
            if polled.quit {
                tracing::info!("quit requested");
                return Ok(());
            }

            self.state.apply_input(polled.input);

            let (state, theme) = (&self.state, &self.theme);
            let mut board = self.board;
            terminal.draw(|f| {
                board = crate::ui::board_rect(f.area(), state);
                crate::ui::draw(f, state, theme);
            })?;
            self.board = board;

            self.state.advance();

            // Fell behind (e.g. suspended): don't try to catch up with a burst of ticks.
            let now = Instant::now();
            if next_frame < now {
                next_frame = now;
            }
        }
    }

    /// Read terminal events until `deadline`; at most one click and one reset survive.
    fn poll_until(&self, deadline: Instant) -> Result<Polled> {
        let mut polled = Polled::default();
        loop {
            let timeout = deadline.saturating_duration_since(Instant::now());
            if !event::poll(timeout)? {
                return Ok(polled);
            }
            polled.record(event_to_action(&event::read()?), self.board);
            if polled.quit {
                return Ok(polled);
            }
        }
    }
}
