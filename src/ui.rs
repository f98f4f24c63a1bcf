//! Layout and drawing: board, status line, and mapping terminal clicks onto board units.

use crate::game::{GameState, TickEvent};
use crate::grid::{Cell, Colour};
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

/// Terminal columns per board unit. Terminal cells are roughly twice as tall as wide.
const UNIT_COLUMNS: u16 = 2;
/// Rows below the board: status line and key hints.
const STATUS_HEIGHT: u16 = 2;

/// Board size in terminal cells including its border.
pub fn board_terminal_size(width: usize, height: usize, cell_size: u16) -> (u64, u64) {
    let unit = u64::from(cell_size);
    (
        width as u64 * unit * u64::from(UNIT_COLUMNS) + 2,
        height as u64 * unit + 2,
    )
}

/// Inner board rect (no border) for `area`; matches `draw` layout.
pub fn board_rect(area: Rect, state: &GameState) -> Rect {
    let (outer, _) = split_area(area, state);
    Block::default().borders(Borders::ALL).inner(outer)
}

/// Centre the bordered board in `area` with the status block underneath.
fn split_area(area: Rect, state: &GameState) -> (Rect, Rect) {
    let grid = &state.grid;
    let (w, h) = board_terminal_size(grid.width(), grid.height(), grid.cell_size() as u16);
    let (w, h) = (w.min(u64::from(u16::MAX)) as u16, h.min(u64::from(u16::MAX)) as u16);

    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Fill(1), Constraint::Length(w), Constraint::Fill(1)])
        .split(area);
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(h),
            Constraint::Length(STATUS_HEIGHT),
            Constraint::Fill(1),
        ])
        .split(horiz[1]);
    (vert[1], vert[2])
}

/// Translate a terminal position into board units relative to the board's top-left corner.
/// Positions left of or above the board come out negative.
pub fn terminal_to_board(board: Rect, column: u16, row: u16) -> (i64, i64) {
    let dx = i64::from(column) - i64::from(board.x);
    let dy = i64::from(row) - i64::from(board.y);
    (dx.div_euclid(i64::from(UNIT_COLUMNS)), dy)
}

/// Darken a colour by `factor` (0.0..=1.0). Named colours pass through.
fn shade(color: Color, factor: f32) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let f = |c: u8| (f32::from(c) * factor).round().clamp(0.0, 255.0) as u8;
            Color::Rgb(f(r), f(g), f(b))
        }
        other => other,
    }
}

/// Draw the board and status line.
pub fn draw(frame: &mut Frame, state: &GameState, theme: &Theme) {
    let area = frame.area();
    let (board_outer, status_area) = split_area(area, state);

    let title = format!(" Samegrid  | Rounds: {} ", state.rounds_won);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.empty))
        .title(Span::styled(title, Style::default().fg(theme.title).add_modifier(Modifier::BOLD)));
    let inner = block.inner(board_outer);
    block.render(board_outer, frame.buffer_mut());

    draw_cells(frame, state, theme, inner);
    draw_status(frame, state, theme, status_area);
}

fn draw_cells(frame: &mut Frame, state: &GameState, theme: &Theme, board: Rect) {
    let size = state.grid.cell_size() as u16;
    let cell_w = size.saturating_mul(UNIT_COLUMNS);
    let cell_h = size;
    let buf = frame.buffer_mut();
    let right = board.x.saturating_add(board.width);
    let bottom = board.y.saturating_add(board.height);

    for &Cell { column, row, colour } in state.grid.cells() {
        let base = theme.colour(colour);
        let x0 = board.x.saturating_add((column as u16).saturating_mul(cell_w));
        let y0 = board.y.saturating_add((row as u16).saturating_mul(cell_h));
        for dy in 0..cell_h {
            for dx in 0..cell_w {
                let (x, y) = (x0.saturating_add(dx), y0.saturating_add(dy));
                if x >= right || y >= bottom {
                    continue;
                }
                // Bottom row and right column of each tile are darker so tiles read as separate.
                let edge = colour != Colour::Empty
                    && size > 1
                    && (dy == cell_h - 1 || dx >= cell_w - UNIT_COLUMNS / 2);
                let color = if edge { shade(base, 0.7) } else { base };
                buf[(x, y)].set_symbol(" ").set_style(Style::default().bg(color));
            }
        }
    }
}

fn event_message(event: TickEvent) -> String {
    match event {
        TickEvent::Matched {
            column,
            row,
            colour,
            pairs,
        } => {
            let plural = if pairs == 1 { "pair" } else { "pairs" };
            format!(
                "Cleared {pairs} {} {plural} at column {}, row {}",
                colour.name(),
                column + 1,
                row + 1
            )
        }
        TickEvent::Reset => "Colours reset".to_string(),
        TickEvent::RoundWon { round } => format!("You won round {round}! New board."),
        TickEvent::Reshuffled => "No pairs on the board, reshuffled".to_string(),
    }
}

fn draw_status(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) {
    let message = state
        .last_event
        .map_or_else(|| "Click a tile next to one of the same colour".to_string(), event_message);
    let colours = state
        .palette()
        .colours()
        .iter()
        .map(|&c| Span::styled("■ ", Style::default().fg(theme.colour(c))));
    let lines = vec![
        Line::from(Span::styled(message, Style::default().fg(theme.main_fg))),
        Line::from(
            colours
                .chain([
                    Span::styled(" [R] ", Style::default().fg(theme.title)),
                    Span::styled("RECOLOUR  ", Style::default().fg(theme.inactive_fg)),
                    Span::styled("[Q] ", Style::default().fg(theme.title)),
                    Span::styled("QUIT", Style::default().fg(theme.inactive_fg)),
                ])
                .collect::<Vec<_>>(),
        ),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(area, frame.buffer_mut());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Palette;
    use crate::grid::Grid;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn state(width: usize, height: usize, cell_size: u32) -> GameState {
        GameState::with_grid(
            Grid::initialise(height, width, cell_size),
            Palette::default(),
            StdRng::seed_from_u64(11),
        )
    }

    #[test]
    fn test_board_terminal_size() {
        assert_eq!(board_terminal_size(10, 10, 2), (42, 22));
        assert_eq!(board_terminal_size(1, 1, 1), (4, 3));
    }

    #[test]
    fn test_board_rect_is_centred() {
        let s = state(10, 10, 2);
        let area = Rect::new(0, 0, 80, 30);
        let board = board_rect(area, &s);
        assert_eq!((board.width, board.height), (40, 20));
        // (80 - 42) / 2 = 19 border column, board starts one further in.
        assert_eq!(board.x, 20);
    }

    #[test]
    fn test_terminal_to_board_edges() {
        let s = state(10, 10, 2);
        let board = Rect::new(20, 4, 40, 20);
        // Last terminal cell of the board hits the last grid cell.
        let (x, y) = terminal_to_board(board, 59, 23);
        assert_eq!(s.grid.cell_at(x, y), Some(99));
        // One column past the right edge is outside.
        let (x, y) = terminal_to_board(board, 60, 4);
        assert_eq!(s.grid.cell_at(x, y), None);
        // Border column to the left maps to a negative unit.
        assert_eq!(terminal_to_board(board, 19, 4), (-1, 0));
        let (x, y) = terminal_to_board(board, 19, 4);
        assert_eq!(s.grid.cell_at(x, y), None);
        // Second cell starts at terminal column 24.
        let (x, y) = terminal_to_board(board, 24, 5);
        assert_eq!(s.grid.cell_at(x, y), Some(1));
    }

    #[test]
    fn test_shade() {
        assert_eq!(shade(Color::Rgb(100, 200, 10), 0.5), Color::Rgb(50, 100, 5));
        assert_eq!(shade(Color::Red, 0.5), Color::Red);
    }

    #[test]
    fn test_draw_paints_cell_colours() {
        let mut s = state(2, 1, 1);
        s.grid.set_colour(0, Colour::Red);
        s.grid.set_colour(1, Colour::Empty);
        let theme = Theme::default();
        let mut terminal = Terminal::new(TestBackend::new(30, 10)).unwrap();
        terminal.draw(|f| draw(f, &s, &theme)).unwrap();
        let board = board_rect(Rect::new(0, 0, 30, 10), &s);
        let buf = terminal.backend().buffer();
        assert_eq!(buf[(board.x, board.y)].bg, theme.colour(Colour::Red));
        assert_eq!(buf[(board.x + 2, board.y)].bg, theme.empty);
        let title = &buf[(board.x + 1, board.y - 1)];
        assert_eq!(title.symbol(), "S");
        assert!(title.modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_event_messages() {
        assert_eq!(
            event_message(TickEvent::Matched {
                column: 3,
                row: 0,
                colour: Colour::Blue,
                pairs: 2
            }),
            "Cleared 2 blue pairs at column 4, row 1"
        );
        assert!(event_message(TickEvent::RoundWon { round: 3 }).contains('3'));
    }
}
