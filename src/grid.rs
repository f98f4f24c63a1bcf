//! Grid data model: cells, palette, row-major indexing and pointer resolution.

/// Cell colour: one of the playable palette or the empty marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Colour {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
    Empty,
}

impl Colour {
    /// Playable colours in palette order. `Empty` is never drawn at random.
    pub const PLAYABLE: [Self; 5] = [Self::Red, Self::Green, Self::Blue, Self::Yellow, Self::Purple];

    #[inline]
    pub fn is_empty(self) -> bool {
        self == Self::Empty
    }

    /// Slot in the theme's tile colours; `None` for `Empty` (drawn as background).
    pub fn theme_index(self) -> Option<usize> {
        match self {
            Self::Red => Some(0),
            Self::Green => Some(1),
            Self::Blue => Some(2),
            Self::Yellow => Some(3),
            Self::Purple => Some(4),
            Self::Empty => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Yellow => "yellow",
            Self::Purple => "purple",
            Self::Empty => "empty",
        }
    }
}

/// Single grid cell. `column`/`row` always match the cell's storage slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub column: usize,
    pub row: usize,
    pub colour: Colour,
}

/// Orthogonal neighbour directions, in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];
}

/// Playfield: `width × height` cells stored row-major, `index = column + row * width`.
/// Row 0 is the top.
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    cell_size: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Build a `columns × rows` grid with every cell `Empty`.
    /// Callers validate that all arguments are non-zero (see `GameConfig::validate`).
    pub fn initialise(rows: usize, columns: usize, cell_size: u32) -> Self {
        let cells = (0..rows)
            .flat_map(|row| {
                (0..columns).map(move |column| Cell {
                    column,
                    row,
                    colour: Colour::Empty,
                })
            })
            .collect();
        Self {
            width: columns,
            height: rows,
            cell_size,
            cells,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Read-only view of every cell in storage order, for the renderer.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn index_of(&self, column: usize, row: usize) -> Option<usize> {
        (column < self.width && row < self.height).then(|| column + row * self.width)
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    #[inline]
    pub fn colour(&self, index: usize) -> Option<Colour> {
        self.cells.get(index).map(|c| c.colour)
    }

    #[inline]
    pub fn colour_at(&self, column: usize, row: usize) -> Option<Colour> {
        self.index_of(column, row).and_then(|i| self.colour(i))
    }

    #[inline]
    pub fn set_colour(&mut self, index: usize, colour: Colour) {
        if let Some(cell) = self.cells.get_mut(index) {
            cell.colour = colour;
        }
    }

    /// Exchange the colours of two slots. Positions stay with their slots,
    /// so this is a content swap that keeps `(column, row)` consistent.
    #[inline]
    pub fn swap_colours(&mut self, a: usize, b: usize) {
        if a == b || a >= self.cells.len() || b >= self.cells.len() {
            return;
        }
        let tmp = self.cells[a].colour;
        self.cells[a].colour = self.cells[b].colour;
        self.cells[b].colour = tmp;
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.iter_mut()
    }

    /// Neighbour index in `dir`, or `None` when it would cross the edge. No wraparound.
    pub fn neighbour(&self, index: usize, dir: Direction) -> Option<usize> {
        let cell = self.get(index)?;
        let (column, row) = (cell.column, cell.row);
        match dir {
            Direction::Up => row.checked_sub(1).and_then(|r| self.index_of(column, r)),
            Direction::Right => self.index_of(column + 1, row),
            Direction::Down => self.index_of(column, row + 1),
            Direction::Left => column.checked_sub(1).and_then(|c| self.index_of(c, row)),
        }
    }

    /// In-bounds orthogonal neighbours in Up, Right, Down, Left order.
    pub fn neighbours(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |dir| self.neighbour(index, dir))
    }

    /// Board extent in pointer units.
    pub fn pixel_size(&self) -> (u64, u64) {
        let size = u64::from(self.cell_size);
        (self.width as u64 * size, self.height as u64 * size)
    }

    /// Resolve a pointer position (board units, origin at the top-left) to a cell index.
    /// Anything outside `[0, width*cell_size) x [0, height*cell_size)` is `None`.
    pub fn cell_at(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || self.cell_size == 0 {
            return None;
        }
        let (px, py) = (x as u64, y as u64);
        let (max_x, max_y) = self.pixel_size();
        if px >= max_x || py >= max_y {
            return None;
        }
        let size = u64::from(self.cell_size);
        self.index_of((px / size) as usize, (py / size) as usize)
    }

    /// Build a grid from colours listed row by row. Test helper.
    #[cfg(test)]
    pub fn from_rows(rows: &[&[Colour]], cell_size: u32) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        let mut grid = Self::initialise(height, width, cell_size);
        for (row, colours) in rows.iter().enumerate() {
            assert_eq!(colours.len(), width, "ragged test grid");
            for (column, &colour) in colours.iter().enumerate() {
                let i = column + row * width;
                grid.set_colour(i, colour);
            }
        }
        grid
    }

    #[cfg(test)]
    pub fn colours(&self) -> Vec<Colour> {
        self.cells.iter().map(|c| c.colour).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_initialise_all_empty() {
        let g = Grid::initialise(3, 4, 5);
        assert_eq!(g.cell_count(), 12);
        assert_eq!((g.width(), g.height(), g.cell_size()), (4, 3, 5));
        assert!(g.cells().iter().all(|c| c.colour.is_empty()));
    }

    #[test]
    fn test_row_major_layout() {
        let g = Grid::initialise(3, 4, 1);
        let c = g.get(6).unwrap();
        assert_eq!((c.column, c.row), (2, 1));
        assert_eq!(g.index_of(3, 2), Some(11));
        assert_eq!(g.index_of(4, 0), None);
    }

    #[test]
    fn test_neighbours_no_wraparound() {
        // 3 wide, 2 tall: index 2 is the top-right corner.
        let g = Grid::initialise(2, 3, 1);
        assert_eq!(g.neighbours(2).collect::<Vec<_>>(), vec![5, 1]);
        // index 3 is the bottom-left corner.
        assert_eq!(g.neighbours(3).collect::<Vec<_>>(), vec![0, 4]);
        assert_eq!(g.neighbour(3, Direction::Left), None);
        assert_eq!(g.neighbours(4).count(), 3);
    }

    #[test]
    fn test_swap_colours_keeps_positions() {
        let mut g = Grid::from_rows(&[&[Colour::Red], &[Colour::Empty]], 1);
        g.swap_colours(0, 1);
        assert_eq!(g.colours(), vec![Colour::Empty, Colour::Red]);
        assert_eq!((g.get(1).unwrap().column, g.get(1).unwrap().row), (0, 1));
    }

    #[test]
    fn test_cell_at_edges() {
        let g = Grid::initialise(10, 10, 50);
        assert_eq!(g.cell_at(0, 0), Some(0));
        assert_eq!(g.cell_at(50 * 10 - 1, 50 * 10 - 1), Some(99));
        assert_eq!(g.cell_at(50 * 10, 0), None);
        assert_eq!(g.cell_at(0, 50 * 10), None);
        assert_eq!(g.cell_at(-1, 10), None);
        assert_eq!(g.cell_at(149, 51), Some(12));
    }

    #[test]
    fn test_cell_at_non_square_grid() {
        // 4 columns, 2 rows, cell size 3.
        let g = Grid::initialise(2, 4, 3);
        assert_eq!(g.cell_at(11, 5), Some(7));
        assert_eq!(g.cell_at(12, 0), None);
        assert_eq!(g.cell_at(0, 6), None);
    }

    #[test]
    fn test_palette_excludes_empty() {
        assert!(!Colour::PLAYABLE.contains(&Colour::Empty));
        assert_eq!(Colour::Empty.theme_index(), None);
        let slots: HashSet<_> = Colour::PLAYABLE.iter().filter_map(|c| c.theme_index()).collect();
        assert_eq!(slots.len(), Colour::PLAYABLE.len());
    }

    proptest! {
        #[test]
        fn initialise_covers_rectangle(rows in 1usize..24, columns in 1usize..24, size in 1u32..64) {
            let g = Grid::initialise(rows, columns, size);
            prop_assert_eq!(g.cell_count(), rows * columns);
            let positions: HashSet<(usize, usize)> =
                g.cells().iter().map(|c| (c.column, c.row)).collect();
            prop_assert_eq!(positions.len(), rows * columns);
            for (i, c) in g.cells().iter().enumerate() {
                prop_assert!(c.column < columns && c.row < rows);
                prop_assert_eq!(g.index_of(c.column, c.row), Some(i));
            }
        }

        #[test]
        fn neighbours_are_orthogonally_adjacent(rows in 1usize..12, columns in 1usize..12, seed in any::<usize>()) {
            let g = Grid::initialise(rows, columns, 1);
            let i = seed % g.cell_count();
            let c = *g.get(i).unwrap();
            for n in g.neighbours(i) {
                let d = *g.get(n).unwrap();
                let dist = c.column.abs_diff(d.column) + c.row.abs_diff(d.row);
                prop_assert_eq!(dist, 1);
            }
        }

        #[test]
        fn cell_at_inverts_cell_origin(rows in 1usize..16, columns in 1usize..16, size in 1u32..32, seed in any::<usize>()) {
            let g = Grid::initialise(rows, columns, size);
            let i = seed % g.cell_count();
            let c = *g.get(i).unwrap();
            let s = i64::from(size);
            let (x, y) = (c.column as i64 * s, c.row as i64 * s);
            prop_assert_eq!(g.cell_at(x, y), Some(i));
            prop_assert_eq!(g.cell_at(x + s - 1, y + s - 1), Some(i));
        }
    }
}
