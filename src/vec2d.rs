use std::ops::{Index, IndexMut};

use crate::position::Position;

/// Flat 2D grid indexed by `Position`. Rows shorter than the widest one are
/// padded with the fill value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Vec2d<T> {
    data: Vec<T>,
    rows: u16,
    cols: u16,
}

impl<T: Copy> Vec2d<T> {
    pub(crate) fn new(grid: &[Vec<T>], fill: T) -> Self {
        assert!(!grid.is_empty());

        let max_cols = grid.iter().map(|row| row.len()).max().unwrap();
        assert!(max_cols > 0);

        let mut data = Vec::with_capacity(grid.len() * max_cols);
        for row in grid {
            data.extend_from_slice(row);
            for _ in row.len()..max_cols {
                data.push(fill);
            }
        }
        Vec2d {
            data,
            rows: grid.len() as u16,
            cols: max_cols as u16,
        }
    }

    /// A same-sized grid for bookkeeping during a traversal.
    pub(crate) fn create_scratchpad<U: Copy>(&self, default: U) -> Vec2d<U> {
        Vec2d {
            data: vec![default; self.data.len()],
            rows: self.rows,
            cols: self.cols,
        }
    }
}

impl<T> Vec2d<T> {
    pub(crate) fn rows(&self) -> u16 {
        self.rows
    }

    pub(crate) fn cols(&self) -> u16 {
        self.cols
    }

    pub(crate) fn get(&self, pos: Position) -> Option<&T> {
        if pos.row < 0
            || pos.col < 0
            || pos.row as u16 >= self.rows
            || pos.col as u16 >= self.cols
        {
            return None;
        }
        Some(&self.data[pos.row as usize * self.cols as usize + pos.col as usize])
    }
}

impl<T> Index<Position> for Vec2d<T> {
    type Output = T;

    fn index(&self, pos: Position) -> &T {
        let index = pos.row as usize * self.cols as usize + pos.col as usize;
        &self.data[index]
    }
}

impl<T> IndexMut<Position> for Vec2d<T> {
    fn index_mut(&mut self, pos: Position) -> &mut T {
        let index = pos.row as usize * self.cols as usize + pos.col as usize;
        &mut self.data[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexing_and_padding() {
        let grid = Vec2d::new(&[vec![1, 2, 3], vec![4]], 0);
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid[Position::new(0, 2)], 3);
        assert_eq!(grid[Position::new(1, 0)], 4);
        assert_eq!(grid[Position::new(1, 2)], 0);
    }

    #[test]
    fn bounds() {
        let grid = Vec2d::new(&[vec![true, true], vec![true, true]], false);
        assert!(grid.get(Position::new(-1, 0)).is_none());
        assert!(grid.get(Position::new(0, 2)).is_none());
        assert_eq!(grid.get(Position::new(1, 1)), Some(&true));
    }

    #[test]
    fn scratchpad() {
        let grid = Vec2d::new(&[vec![1, 2], vec![3, 4]], 0);
        let mut scratch = grid.create_scratchpad(false);
        assert_eq!(scratch.rows(), grid.rows());
        scratch[Position::new(0, 1)] = true;
        assert!(scratch[Position::new(0, 1)]);
        assert!(!scratch[Position::new(1, 0)]);
    }
}
