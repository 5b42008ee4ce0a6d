use std::collections::VecDeque;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rand::rngs::ThreadRng;
use rand::seq::IteratorRandom;
use rand::Rng;

use crate::TermInt;
use crate::config::Config;
use crate::snake::{Cell, Direction, Snake};

/// A state change requested by the input side, applied in arrival order.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Intent {
    Turn(Direction),
    TogglePause,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Collision {
    Wall,
    Body,
}

/// What a single frame did to the simulation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Tick {
    Paused,
    /// The move interval has not elapsed yet
    Idle,
    Moved,
    Ate,
    /// The snake crashed. The crash stays on the board until the next reset
    Crashed(Collision),
    /// No free cell was left for food. The board stays full until the next reset
    Cleared,
}

pub struct Engine<R: Rng = ThreadRng> {
    width: TermInt,
    height: TermInt,
    snake: Snake,
    food: Cell,
    move_interval: Duration,
    last_move: Option<Instant>,
    paused: bool,
    intents: VecDeque<Intent>,
    food_avoids_snake: bool,
    board_full: bool,
    ended: bool,
    rng: R,
}

impl Engine<ThreadRng> {
    pub fn new(grid: (TermInt, TermInt), config: &Config) -> Self {
        Engine::with_rng(grid, config, rand::thread_rng())
    }
}

impl<R: Rng> Engine<R> {
    pub fn with_rng(grid: (TermInt, TermInt), config: &Config, rng: R) -> Self {
        let (width, height) = (grid.0.max(1), grid.1.max(1));
        let mut engine = Engine {
            width,
            height,
            snake: Snake::new(Cell::new(0, 0)),
            food: Cell::new(0, 0),
            move_interval: config.move_interval,
            last_move: None,
            paused: false,
            intents: VecDeque::new(),
            food_avoids_snake: config.food_avoids_snake,
            board_full: false,
            ended: false,
            rng,
        };
        engine.reset();
        engine
    }

    pub fn grid(&self) -> (TermInt, TermInt) {
        (self.width, self.height)
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn has_intents(&self) -> bool {
        !self.intents.is_empty()
    }

    pub fn push(&mut self, intent: Intent) {
        self.intents.push_back(intent);
    }

    /// Applies queued intents in order. Turns are dropped while paused.
    pub fn apply_intents(&mut self, now: Instant) {
        while let Some(intent) = self.intents.pop_front() {
            match intent {
                Intent::Turn(dir) if !self.paused => self.snake.set_direction(dir),
                Intent::Turn(_) => {}
                Intent::TogglePause if self.paused => {
                    self.paused = false;
                    // Resuming must not trigger an immediate catch-up move
                    self.last_move = Some(now);
                    debug!("Resumed");
                }
                Intent::TogglePause => {
                    self.paused = true;
                    debug!("Paused");
                }
            }
        }
    }

    /// One display refresh: drain input, advance if due. A crash or a full board is left in
    /// place so it can be drawn; the caller resets, or the following frame does.
    pub fn frame(&mut self, now: Instant) -> Tick {
        self.apply_intents(now);

        if self.ended {
            self.reset();
        }

        if self.paused {
            return Tick::Paused;
        }

        let tick = self.step(now);

        if self.board_full {
            info!("Board cleared at length {}", self.snake.len());
            self.ended = true;
            return Tick::Cleared;
        }

        if let Some(collision) = self.collision() {
            let head = self.snake.head();
            info!("Crashed ({:?}) at {:?}, length {}", collision, head, self.snake.len());
            self.ended = true;
            return Tick::Crashed(collision);
        }

        tick
    }

    /// Whether the last frame ended the game and no reset has happened since.
    pub fn has_ended(&self) -> bool {
        self.ended
    }

    /// Moves the snake one cell if the move interval has elapsed since the last accepted move.
    pub fn step(&mut self, now: Instant) -> Tick {
        if let Some(last) = self.last_move {
            if now.saturating_duration_since(last) < self.move_interval {
                return Tick::Idle;
            }
        }
        self.last_move = Some(now);

        let new_head = self.snake.push_head();
        let ate = new_head == self.food;

        if ate {
            self.snake.grow();
            debug!("Ate food at {:?}", new_head);
            self.place_food();
        }

        self.snake.settle();

        if ate { Tick::Ate } else { Tick::Moved }
    }

    pub fn collision(&self) -> Option<Collision> {
        let head = self.snake.head();

        if head.x < 0 || head.y < 0 || head.x >= self.width as i32 || head.y >= self.height as i32 {
            Some(Collision::Wall)
        } else if self.snake.bites_itself() {
            Some(Collision::Body)
        } else {
            None
        }
    }

    pub fn check_collision(&self) -> bool {
        self.collision().is_some()
    }

    /// Picks a new food cell. Each axis is drawn independently unless food must avoid the snake.
    pub fn place_food(&mut self) {
        if !self.food_avoids_snake {
            self.food = Cell::new(
                self.rng.gen_range(0..self.width as i32),
                self.rng.gen_range(0..self.height as i32),
            );
            return;
        }

        let (width, height) = (self.width as i32, self.height as i32);
        let snake = &self.snake;
        let free = (0..height)
            .flat_map(|y| (0..width).map(move |x| Cell::new(x, y)))
            .filter(|pos| !snake.occupies(*pos))
            .choose(&mut self.rng);

        match free {
            Some(pos) => self.food = pos,
            None => {
                warn!("No free cell left for food");
                self.board_full = true;
            }
        }
    }

    /// Single stationary cell at the center, fresh food. The pause flag is left alone.
    pub fn reset(&mut self) {
        let center = Cell::new(self.width as i32 / 2, self.height as i32 / 2);
        self.snake = Snake::new(center);
        self.board_full = false;
        self.ended = false;
        self.place_food();
        debug!("Reset: snake at {:?}, food at {:?}", center, self.food);
    }

    #[cfg(test)]
    pub(crate) fn set_state(&mut self, snake: Snake, food: Cell) {
        self.snake = snake;
        self.food = food;
    }
}
