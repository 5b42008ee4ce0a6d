use std::time::Instant;

use anyhow::Result;
use log::{debug, info};
use rand::Rng;

use crate::config::Config;
use crate::engine::{Engine, Tick};
use crate::input::{is_ctrl_c, Control, InputController};
use crate::render::{draw_frame, CellLayout, Palette};
use crate::scheduler::{FrameScheduler, PauseChange};
use crate::term::TermManager;

pub struct SnakeGame {
    term: TermManager,
    engine: Engine,
    input: InputController,
    scheduler: FrameScheduler,
    layout: CellLayout,
    palette: Palette,
}

impl SnakeGame {
    /// Sizes the grid to the terminal. The terminal must already be set up.
    pub fn new(term: TermManager, config: &Config) -> Self {
        let engine = Engine::new(config.grid_for(term.get_terminal_size()), config);
        let (width, height) = engine.grid();
        info!("Grid is {}x{} cells", width, height);

        SnakeGame {
            term,
            engine,
            input: InputController::new(config),
            scheduler: FrameScheduler::new(config.frame_interval),
            layout: CellLayout::from(config),
            palette: Palette::default(),
        }
    }

    pub fn into_term(self) -> TermManager {
        self.term
    }

    /// Returns `false` if the player quit instead of starting.
    pub fn show_intro(&mut self) -> Result<bool> {
        let lines = &[
            "Arrow keys or WASD to move",
            "Space or Esc to pause",
            "Click to steer, double click to pause",
            "CTRL+C to quit",
            "",
            "Press any key to begin"
        ];

        self.term.show_message(lines)?;

        if is_ctrl_c(&self.term.read_key_blocking()?) {
            return Ok(false);
        }

        self.term.hide_message()?;
        Ok(true)
    }

    /// Runs until the player quits.
    pub fn play(&mut self) -> Result<()> {
        self.scheduler.start(Instant::now());

        loop {
            let timeout = self.scheduler.timeout(Instant::now());

            for event in self.term.read_events(timeout)? {
                let head = self.engine.snake().head();
                match self.input.translate(&event, Instant::now(), head) {
                    Some(Control::Quit) => return Ok(()),
                    Some(Control::Game(intent)) => self.engine.push(intent),
                    None => {}
                }
            }

            let now = Instant::now();

            // With frames halted only input can wake us, so intents are applied here too
            if self.engine.has_intents() {
                match apply_input(&mut self.engine, &mut self.scheduler, now) {
                    Some(PauseChange::Halted) => {
                        debug!("Frames halted");
                        self.term.show_message(&[
                            "Paused",
                            "Space or double click to resume",
                            "or Ctrl+C to quit",
                        ])?;
                    }
                    Some(PauseChange::Resumed) => {
                        self.term.hide_message()?;
                        debug!("Frames resumed");
                    }
                    None => {}
                }
            }

            if !self.scheduler.due(now) {
                continue;
            }

            // A crash is drawn before the reset so the player sees where it happened
            let tick = self.engine.frame(now);
            draw_frame(&self.engine, &mut self.term, self.layout, &self.palette)?;

            let headline = match tick {
                Tick::Crashed(_) => "Game over!",
                Tick::Cleared => "You won!",
                _ => continue,
            };

            let lines = [headline, "", "Press any key to play again,", "or CTRL+C to quit."];
            if !self.notify(&lines)? {
                return Ok(());
            }
            self.engine.reset();
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    /// Blocking notice at the end of a game. Returns `false` on CTRL+C.
    fn notify(&mut self, lines: &[&str]) -> Result<bool> {
        self.term.show_message(lines)?;
        let key = self.term.read_key_blocking()?;
        self.term.hide_message()?;
        Ok(!is_ctrl_c(&key))
    }
}

/// Applies queued input and keeps frame scheduling in step with the pause flag.
pub fn apply_input<R: Rng>(
    engine: &mut Engine<R>,
    scheduler: &mut FrameScheduler,
    now: Instant,
) -> Option<PauseChange> {
    engine.apply_intents(now);
    scheduler.follow_pause(engine.is_paused(), now)
}
