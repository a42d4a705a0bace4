//! Grid positions and their classification

/// Position of a cell in the square pairplot grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellPosition {
    pub row: usize,
    pub col: usize,
}

/// Where a cell sits relative to the main diagonal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Diagonal,
    Upper,
    Lower,
}

impl CellPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Position of the `index`-th cell in row-major order
    pub fn from_flat_index(index: usize, n: usize) -> Self {
        Self {
            row: index / n,
            col: index % n,
        }
    }

    pub fn flat_index(&self, n: usize) -> usize {
        self.row * n + self.col
    }

    pub fn kind(&self) -> CellKind {
        use std::cmp::Ordering;
        match self.col.cmp(&self.row) {
            Ordering::Equal => CellKind::Diagonal,
            Ordering::Greater => CellKind::Upper,
            Ordering::Less => CellKind::Lower,
        }
    }

    /// On or below the main diagonal
    pub fn is_lower_or_diagonal(&self) -> bool {
        self.col <= self.row
    }

    pub fn is_top(&self) -> bool {
        self.row == 0
    }

    pub fn is_left(&self) -> bool {
        self.col == 0
    }

    pub fn is_bottom(&self, n: usize) -> bool {
        self.row + 1 == n
    }

    pub fn is_right(&self, n: usize) -> bool {
        self.col + 1 == n
    }
}

/// All positions of an `n` x `n` grid in row-major order
pub fn row_major(n: usize) -> impl Iterator<Item = CellPosition> {
    (0..n * n).map(move |i| CellPosition::from_flat_index(i, n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind() {
        assert_eq!(CellPosition::new(2, 2).kind(), CellKind::Diagonal);
        assert_eq!(CellPosition::new(0, 3).kind(), CellKind::Upper);
        assert_eq!(CellPosition::new(3, 0).kind(), CellKind::Lower);
    }

    #[test]
    fn test_row_major_order() {
        let cells: Vec<_> = row_major(3).collect();
        assert_eq!(cells.len(), 9);
        assert_eq!(cells[0], CellPosition::new(0, 0));
        assert_eq!(cells[1], CellPosition::new(0, 1));
        assert_eq!(cells[3], CellPosition::new(1, 0));
        assert_eq!(cells[8], CellPosition::new(2, 2));
        for (i, cell) in cells.iter().enumerate() {
            assert_eq!(cell.flat_index(3), i);
        }
    }

    #[test]
    fn test_edges() {
        let n = 4;
        let corner = CellPosition::new(3, 0);
        assert!(corner.is_left() && corner.is_bottom(n));
        assert!(!corner.is_top() && !corner.is_right(n));

        let top_right = CellPosition::new(0, 3);
        assert!(top_right.is_top() && top_right.is_right(n));
    }

    #[test]
    fn test_triangle_counts() {
        let n = 7;
        let count = |kind: CellKind| row_major(n).filter(|c| c.kind() == kind).count();
        assert_eq!(count(CellKind::Diagonal), 7);
        assert_eq!(count(CellKind::Upper), 21);
        assert_eq!(count(CellKind::Lower), 21);
    }
}
