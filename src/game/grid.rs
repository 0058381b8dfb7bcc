use super::action::Direction;

/// A position on the game grid, in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move cell by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move cell one step in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The discrete playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    /// Width in cells
    pub width: usize,
    /// Height in cells
    pub height: usize,
    /// Edge length of one cell in pixels
    pub cell_size: u32,
}

impl Grid {
    pub fn new(width: usize, height: usize, cell_size: u32) -> Self {
        Self {
            width,
            height,
            cell_size,
        }
    }

    /// Check if a cell is within the grid bounds
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.width as i32 && cell.y >= 0 && cell.y < self.height as i32
    }

    /// Total number of cells
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Top-left pixel of a cell
    pub fn to_pixels(&self, cell: Cell) -> (i32, i32) {
        let size = self.cell_size as i32;
        (cell.x * size, cell.y * size)
    }

    /// Cell containing a pixel coordinate, which may lie outside the grid
    pub fn cell_at_pixel(&self, px: f32, py: f32) -> Cell {
        let size = self.cell_size as f32;
        Cell::new((px / size).floor() as i32, (py / size).floor() as i32)
    }

    /// The cell the snake spawns on
    pub fn center(&self) -> Cell {
        Cell::new((self.width / 2) as i32, (self.height / 2) as i32)
    }

    /// Iterate every cell, row by row
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height as i32)
            .flat_map(move |y| (0..self.width as i32).map(move |x| Cell::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_movement() {
        let cell = Cell::new(5, 5);
        assert_eq!(cell.moved_by(1, 0), Cell::new(6, 5));
        assert_eq!(cell.moved_by(-1, 0), Cell::new(4, 5));
        assert_eq!(cell.moved_in_direction(Direction::Down), Cell::new(5, 6));
        assert_eq!(cell.moved_in_direction(Direction::Up), Cell::new(5, 4));
    }

    #[test]
    fn test_bounds_checking() {
        let grid = Grid::new(40, 30, 20);

        assert!(grid.contains(Cell::new(0, 0)));
        assert!(grid.contains(Cell::new(39, 29)));
        assert!(!grid.contains(Cell::new(-1, 0)));
        assert!(!grid.contains(Cell::new(40, 0)));
        assert!(!grid.contains(Cell::new(0, 30)));
        assert!(!grid.contains(Cell::new(0, -1)));
    }

    #[test]
    fn test_pixel_conversion() {
        let grid = Grid::new(40, 30, 20);
        assert_eq!(grid.to_pixels(Cell::new(3, 2)), (60, 40));
        assert_eq!(grid.cell_at_pixel(69.0, 40.5), Cell::new(3, 2));
        assert_eq!(grid.cell_at_pixel(-0.5, 10.0), Cell::new(-1, 0));
    }

    #[test]
    fn test_center_and_cells() {
        let grid = Grid::new(40, 30, 20);
        assert_eq!(grid.center(), Cell::new(20, 15));

        let small = Grid::new(3, 2, 10);
        let cells: Vec<Cell> = small.cells().collect();
        assert_eq!(cells.len(), small.area());
        assert_eq!(cells[0], Cell::new(0, 0));
        assert_eq!(cells[5], Cell::new(2, 1));
    }
}
