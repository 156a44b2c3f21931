use std::{
    fmt,
    ops::{Index, IndexMut},
};

/// A `(row, col)` coordinate in a [`Grid`]
pub type Pos = (usize, usize);

/// A fixed-size 2-D binary array stored row-major
///
/// Every cell holds either `0` or `1`. Two grids are equal only if they have the same
/// dimensions and agree on every cell.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<u8>,
}

impl Grid {
    /// Construct an all-zero grid
    ///
    /// **Panics** if either dimension is zero
    pub fn zeros(rows: usize, cols: usize) -> Self {
        assert!(rows > 0 && cols > 0, "Grid dimensions must be non-zero");
        Self {
            rows,
            cols,
            cells: vec![0; rows * cols],
        }
    }

    /// Construct a grid from a slice of rows; any non-zero value is stored as `1`
    ///
    /// **Panics** if there are no rows or `C` is zero
    pub fn from_rows<const C: usize>(rows: &[[u8; C]]) -> Self {
        let mut grid = Self::zeros(rows.len(), C);
        for (cell, &v) in grid.cells.iter_mut().zip(rows.iter().flatten()) {
            *cell = (v != 0) as u8;
        }
        grid
    }

    /// Construct a grid by thresholding raw intensities: values `>= threshold` become `1`
    ///
    /// **Panics** if `values.len() != rows * cols`
    pub fn binarize(rows: usize, cols: usize, values: &[u8], threshold: u8) -> Self {
        assert_eq!(values.len(), rows * cols, "Value count must match grid dimensions");
        let mut grid = Self::zeros(rows, cols);
        for (cell, &v) in grid.cells.iter_mut().zip(values) {
            *cell = (v >= threshold) as u8;
        }
        grid
    }

    /// A grid with a single set cell at `pos`
    pub fn one_hot(rows: usize, cols: usize, pos: Pos) -> Self {
        let mut grid = Self::zeros(rows, cols);
        grid.set(pos);
        grid
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Row-major view of the cells
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Whether `pos` lies within `[0, rows) x [0, cols)`
    pub fn contains(&self, pos: Pos) -> bool {
        pos.0 < self.rows && pos.1 < self.cols
    }

    pub fn is_set(&self, pos: Pos) -> bool {
        self[pos] == 1
    }

    pub fn set(&mut self, pos: Pos) {
        self[pos] = 1;
    }

    /// Number of set cells
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == 1).count()
    }

    /// Iterate over the rows as slices
    pub fn iter_rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks(self.cols)
    }

    /// Swap rows and columns
    pub fn transpose(&self) -> Self {
        let mut out = Self::zeros(self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                out[(c, r)] = self[(r, c)];
            }
        }
        out
    }

    /// Rotate counter-clockwise by `k` quarter turns
    ///
    /// Odd `k` swaps the dimensions of non-square grids.
    pub fn rot90(&self, k: usize) -> Self {
        let (rows, cols) = (self.rows, self.cols);
        match k % 4 {
            0 => self.clone(),
            1 => {
                let mut out = Self::zeros(cols, rows);
                for r in 0..cols {
                    for c in 0..rows {
                        out[(r, c)] = self[(c, cols - 1 - r)];
                    }
                }
                out
            }
            2 => {
                let mut out = self.clone();
                out.cells.reverse();
                out
            }
            _ => {
                let mut out = Self::zeros(cols, rows);
                for r in 0..cols {
                    for c in 0..rows {
                        out[(r, c)] = self[(rows - 1 - c, r)];
                    }
                }
                out
            }
        }
    }

    /// Cells as `f32`, row-major
    pub fn to_f32(&self) -> impl Iterator<Item = f32> + '_ {
        self.cells.iter().map(|&c| c as f32)
    }
}

impl Index<Pos> for Grid {
    type Output = u8;

    fn index(&self, (row, col): Pos) -> &Self::Output {
        assert!(row < self.rows && col < self.cols, "Grid index out of bounds");
        &self.cells[row * self.cols + col]
    }
}

impl IndexMut<Pos> for Grid {
    fn index_mut(&mut self, (row, col): Pos) -> &mut Self::Output {
        assert!(row < self.rows && col < self.cols, "Grid index out of bounds");
        &mut self.cells[row * self.cols + col]
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid {}x{}", self.rows, self.cols)?;
        for row in self.iter_rows() {
            let line: String = row.iter().map(|&c| if c == 1 { '#' } else { '.' }).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_functional() {
        let mut grid = Grid::zeros(2, 3);
        assert_eq!(grid.shape(), (2, 3), "shape correct");
        assert_eq!(grid.count(), 0, "initialized empty");

        grid.set((1, 2));
        assert!(grid.is_set((1, 2)), "cell set");
        assert_eq!(grid.cells(), [0, 0, 0, 0, 0, 1], "row-major layout");
        assert!(grid.contains((1, 2)), "last cell in bounds");
        assert!(!grid.contains((2, 0)), "row past end out of bounds");
        assert!(!grid.contains((0, 3)), "col past end out of bounds");
    }

    #[test]
    fn from_rows_normalizes() {
        let grid = Grid::from_rows(&[[0, 5], [1, 0]]);
        assert_eq!(grid.cells(), [0, 1, 1, 0], "non-zero values stored as 1");
    }

    #[test]
    fn binarize_thresholds() {
        let grid = Grid::binarize(1, 4, &[0, 127, 128, 255], 128);
        assert_eq!(grid.cells(), [0, 0, 1, 1], "threshold is inclusive");
    }

    #[test]
    fn rot90_matches_quarter_turns() {
        let grid = Grid::from_rows(&[[1, 1, 0], [0, 0, 1]]);

        let ccw = grid.rot90(1);
        assert_eq!(ccw, Grid::from_rows(&[[0, 1], [1, 0], [1, 0]]), "one turn counter-clockwise");

        let half = grid.rot90(2);
        assert_eq!(half, Grid::from_rows(&[[1, 0, 0], [0, 1, 1]]), "half turn");

        let cw = grid.rot90(3);
        assert_eq!(cw, Grid::from_rows(&[[0, 1], [0, 1], [1, 0]]), "three turns counter-clockwise");

        assert_eq!(grid.rot90(4), grid, "full turn is identity");
        assert_eq!(ccw.rot90(3), grid, "turns compose");
    }

    #[test]
    fn transpose_swaps_axes() {
        let grid = Grid::from_rows(&[[1, 0, 0], [1, 1, 0]]);
        assert_eq!(grid.transpose(), Grid::from_rows(&[[1, 1], [0, 1], [0, 0]]));
    }

    #[test]
    fn equality_is_exact() {
        let a = Grid::one_hot(3, 3, (0, 0));
        let mut b = Grid::zeros(3, 3);
        assert_ne!(a, b, "differs before fill");
        b.set((0, 0));
        assert_eq!(a, b, "equal after fill");
        assert_ne!(Grid::zeros(3, 3), Grid::zeros(3, 4), "dimensions participate in equality");
    }
}
