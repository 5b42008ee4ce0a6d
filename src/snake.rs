use std::collections::VecDeque;

use Direction::*;

/// A grid position. Out-of-bounds values are representable so a crashed head can be inspected.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    pub fn moved(&self, (dx, dy): (i32, i32)) -> Self {
        Cell { x: self.x + dx, y: self.y + dy }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }
}

pub struct Snake {
    body: VecDeque<Cell>,
    direction: Option<Direction>,
    grow_next_move: bool,
}

impl Snake {
    /// A single-cell snake that stays put until it gets a direction.
    pub fn new(pos: Cell) -> Self {
        Snake { body: VecDeque::from(vec![pos]), direction: None, grow_next_move: false }
    }

    #[cfg(test)]
    pub fn from_cells(cells: &[Cell], direction: Option<Direction>) -> Self {
        Snake { body: cells.iter().copied().collect(), direction, grow_next_move: false }
    }

    pub fn body(&self) -> &VecDeque<Cell> {
        &self.body
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn get_direction(&self) -> Option<Direction> {
        self.direction
    }

    // Reversals are allowed on purpose, turning back into the neck is a crash
    pub fn set_direction(&mut self, new_direction: Direction) {
        self.direction = Some(new_direction);
    }

    /// Zero vector while stationary.
    pub fn delta(&self) -> (i32, i32) {
        self.direction.map_or((0, 0), |d| d.delta())
    }

    /// Puts the next head in front of the body. The tail is left alone until `settle`.
    pub fn push_head(&mut self) -> Cell {
        let new_head = self.head().moved(self.delta());
        self.body.push_front(new_head);
        new_head
    }

    /// Drops the tail unless growth is pending, in which case the flag is consumed instead.
    pub fn settle(&mut self) -> Option<Cell> {
        if self.grow_next_move {
            self.grow_next_move = false;
            None
        } else {
            self.body.pop_back()
        }
    }

    pub fn grow(&mut self) {
        self.grow_next_move = true;
    }

    pub fn is_growing(&self) -> bool {
        self.grow_next_move
    }

    pub fn occupies(&self, pos: Cell) -> bool {
        self.body.contains(&pos)
    }

    /// Whether the head overlaps any other segment.
    pub fn bites_itself(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|seg| *seg == head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_snake_is_stationary() {
        let snake = Snake::new(Cell::new(3, 4));
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.get_direction(), None);
        assert_eq!(snake.delta(), (0, 0));
    }

    #[test]
    fn test_move_without_growth() {
        let mut snake = Snake::from_cells(&[Cell::new(5, 5), Cell::new(4, 5)], Some(Right));
        let head = snake.push_head();
        assert_eq!(head, Cell::new(6, 5));
        assert_eq!(snake.settle(), Some(Cell::new(4, 5)));
        let body: Vec<Cell> = snake.body().iter().copied().collect();
        assert_eq!(body, vec![Cell::new(6, 5), Cell::new(5, 5)]);
    }

    #[test]
    fn test_move_with_growth_keeps_tail() {
        let mut snake = Snake::from_cells(&[Cell::new(5, 5)], Some(Down));
        snake.grow();
        snake.push_head();
        assert_eq!(snake.settle(), None);
        assert!(!snake.is_growing());
        assert_eq!(snake.len(), 2);
        assert_eq!(snake.head(), Cell::new(5, 6));
    }

    #[test]
    fn test_stationary_tick_keeps_head() {
        let mut snake = Snake::new(Cell::new(2, 2));
        snake.push_head();
        snake.settle();
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), Cell::new(2, 2));
    }

    #[test]
    fn test_reversal_is_accepted() {
        let cells = [Cell::new(5, 5), Cell::new(4, 5), Cell::new(3, 5)];
        let mut snake = Snake::from_cells(&cells, Some(Right));
        snake.set_direction(Left);
        assert_eq!(snake.get_direction(), Some(Left));
        snake.push_head();
        snake.settle();
        assert!(snake.bites_itself());
    }

    #[test]
    fn test_bites_itself_ignores_head() {
        let cells = [Cell::new(1, 1), Cell::new(2, 1), Cell::new(2, 2)];
        let snake = Snake::from_cells(&cells, Some(Left));
        assert!(!snake.bites_itself());
        assert!(snake.occupies(Cell::new(2, 2)));
        assert!(!snake.occupies(Cell::new(0, 0)));
    }
}
