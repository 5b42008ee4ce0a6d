use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::Coords;
use crate::config::Config;
use crate::engine::Intent;
use crate::render::CellLayout;
use crate::snake::{Cell, Direction::*};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Control {
    Game(Intent),
    Quit,
}

/// Turns terminal events into engine intents. Mouse presses stand in for touches.
pub struct InputController {
    layout: CellLayout,
    double_tap: Duration,
    last_tap: Option<Instant>,
}

impl InputController {
    pub fn new(config: &Config) -> Self {
        InputController {
            layout: CellLayout::from(config),
            double_tap: config.double_tap,
            last_tap: None,
        }
    }

    pub fn translate(&mut self, event: &Event, now: Instant, head: Cell) -> Option<Control> {
        match event {
            Event::Key(key) => self.key(key),
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                ..
            }) => Some(Control::Game(self.touch_start((*column, *row), head))),
            Event::Mouse(MouseEvent { kind: MouseEventKind::Up(MouseButton::Left), .. }) => {
                self.touch_end(now).map(Control::Game)
            }
            _ => None,
        }
    }

    pub fn key(&self, key: &KeyEvent) -> Option<Control> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        if is_ctrl_c(key) {
            return Some(Control::Quit);
        }

        let intent = match key.code {
            KeyCode::Char('w') | KeyCode::Up => Intent::Turn(Up),
            KeyCode::Char('a') | KeyCode::Left => Intent::Turn(Left),
            KeyCode::Char('s') | KeyCode::Down => Intent::Turn(Down),
            KeyCode::Char('d') | KeyCode::Right => Intent::Turn(Right),
            KeyCode::Char(' ') | KeyCode::Esc => Intent::TogglePause,
            KeyCode::Char('q') => return Some(Control::Quit),
            _ => return None,
        };

        Some(Control::Game(intent))
    }

    /// Reads a swipe from the touch point relative to the head's top-left corner on screen.
    pub fn touch_start(&self, point: Coords, head: Cell) -> Intent {
        let (head_x, head_y) = self.layout.origin_of(head);
        let dx = point.0 as i32 - head_x;
        let dy = point.1 as i32 - head_y;

        let dir = if dx.abs() > dy.abs() {
            if dx > 0 { Right } else { Left }
        } else if dy > 0 {
            Down
        } else {
            Up
        };

        Intent::Turn(dir)
    }

    /// Two touch ends within the double-tap window toggle pause. Every tap restarts the window.
    pub fn touch_end(&mut self, now: Instant) -> Option<Intent> {
        let double = self.last_tap
            .map_or(false, |last| now.saturating_duration_since(last) < self.double_tap);
        self.last_tap = Some(now);

        if double { Some(Intent::TogglePause) } else { None }
    }
}

pub fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use crate::snake::Direction;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn controller() -> InputController {
        InputController::new(&Config::default())
    }

    fn turn(dir: Direction) -> Option<Control> {
        Some(Control::Game(Intent::Turn(dir)))
    }

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent { kind, column, row, modifiers: KeyModifiers::NONE })
    }

    #[test]
    fn test_arrow_keys() {
        let mut input = controller();
        let (now, head) = (Instant::now(), Cell::new(0, 0));
        assert_eq!(input.translate(&press(KeyCode::Up), now, head), turn(Up));
        assert_eq!(input.translate(&press(KeyCode::Down), now, head), turn(Down));
        assert_eq!(input.translate(&press(KeyCode::Left), now, head), turn(Left));
        assert_eq!(input.translate(&press(KeyCode::Right), now, head), turn(Right));
        assert_eq!(input.translate(&press(KeyCode::Char('a')), now, head), turn(Left));
    }

    #[test]
    fn test_pause_keys_and_quit() {
        let input = controller();
        let space = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE);
        assert_eq!(input.key(&space), Some(Control::Game(Intent::TogglePause)));

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(input.key(&ctrl_c), Some(Control::Quit));
        let q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(input.key(&q), Some(Control::Quit));
    }

    #[test]
    fn test_unknown_input_is_ignored() {
        let mut input = controller();
        let (now, head) = (Instant::now(), Cell::new(0, 0));
        assert_eq!(input.translate(&press(KeyCode::Char('x')), now, head), None);
        assert_eq!(input.translate(&press(KeyCode::Enter), now, head), None);
        assert_eq!(input.translate(&Event::Resize(80, 24), now, head), None);
        let right_click = mouse(MouseEventKind::Down(MouseButton::Right), 3, 3);
        assert_eq!(input.translate(&right_click, now, head), None);
        assert_eq!(input.translate(&mouse(MouseEventKind::Moved, 3, 3), now, head), None);
    }

    #[test]
    fn test_key_release_is_ignored() {
        let input = controller();
        let release = KeyEvent {
            code: KeyCode::Up,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(input.key(&release), None);
    }

    #[test]
    fn test_swipe_picks_dominant_axis() {
        let input = controller();
        // Head (5, 5) sits at column 10, row 5 with 2x1 cells
        let head = Cell::new(5, 5);
        assert_eq!(input.touch_start((20, 7), head), Intent::Turn(Right));
        assert_eq!(input.touch_start((2, 6), head), Intent::Turn(Left));
        assert_eq!(input.touch_start((11, 12), head), Intent::Turn(Down));
        assert_eq!(input.touch_start((9, 0), head), Intent::Turn(Up));
    }

    #[test]
    fn test_swipe_ties_are_vertical() {
        let input = controller();
        let head = Cell::new(5, 5);
        assert_eq!(input.touch_start((13, 8), head), Intent::Turn(Down));
        assert_eq!(input.touch_start((10, 5), head), Intent::Turn(Up));
    }

    #[test]
    fn test_mouse_down_is_touch_start() {
        let mut input = controller();
        let event = mouse(MouseEventKind::Down(MouseButton::Left), 30, 5);
        assert_eq!(input.translate(&event, Instant::now(), Cell::new(5, 5)), turn(Right));
    }

    #[test]
    fn test_double_tap_toggles_pause() {
        let mut input = controller();
        let t0 = Instant::now();
        assert_eq!(input.touch_end(t0), None);
        assert_eq!(input.touch_end(t0 + ms(200)), Some(Intent::TogglePause));
        // Third tap measured from the second one, past the threshold
        assert_eq!(input.touch_end(t0 + ms(600)), None);
    }

    #[test]
    fn test_tap_at_threshold_is_single() {
        let mut input = controller();
        let t0 = Instant::now();
        input.touch_end(t0);
        assert_eq!(input.touch_end(t0 + ms(300)), None);
        assert_eq!(input.touch_end(t0 + ms(301)), Some(Intent::TogglePause));
    }

    #[test]
    fn test_mouse_up_is_touch_end() {
        let mut input = controller();
        let (t0, head) = (Instant::now(), Cell::new(0, 0));
        let up = mouse(MouseEventKind::Up(MouseButton::Left), 0, 0);
        assert_eq!(input.translate(&up, t0, head), None);
        let second = input.translate(&up, t0 + ms(50), head);
        assert_eq!(second, Some(Control::Game(Intent::TogglePause)));
    }
}
