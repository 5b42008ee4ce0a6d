use crate::{TermInt, Coords};
use crate::render::Canvas;
use std::{io::{Stdout, Write, stdout}, time::Duration};

use anyhow::{Context, Result};
use crossterm::{cursor, execute, queue, style::{self, Color}, terminal};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind};
use crossterm::event::{read, poll};
use log::warn;

const MESSAGE_FG: Color = Color::White;
const MESSAGE_BG: Color = Color::DarkGrey;

/// Owns the terminal. Drawing goes to a back buffer and only changed cells are written on
/// `present`.
pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    screen: Vec<Color>,
    shown: Vec<Option<Color>>,
    current_msg: Option<Message>,
}

struct Message {
    top_left: Coords,
    width: TermInt,
    height: TermInt,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size().context("Error reading terminal size")?;
        let cells = width as usize * height as usize;
        Ok(TermManager {
            width,
            height,
            stdout: stdout(),
            screen: vec![Color::Reset; cells],
            shown: vec![None; cells],
            current_msg: None,
        })
    }

    /// Takes over the terminal. A partial setup is rolled back before the error is returned.
    pub fn setup(&mut self) -> Result<()> {
        let entered = self.enter();
        restore_on_error(entered, || self.restore())
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode().context("Error disabling raw mode")?;
        execute!(
            self.stdout,
            style::ResetColor,
            cursor::Show,
            cursor::EnableBlinking,
            DisableMouseCapture,
            LeaveAlternateScreen
        )
        .context("Error leaving alt screen")?;
        Ok(())
    }

    pub fn read_key_blocking(&self) -> Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read().context("Error reading terminal event")? {
                if ev.kind == KeyEventKind::Press {
                    return Ok(ev);
                }
            }
        }
    }

    /// Waits up to `timeout` for input (forever if `None`), then drains whatever else is queued.
    pub fn read_events(&self, timeout: Option<Duration>) -> Result<Vec<Event>> {
        let mut events = vec![];

        let ready = match timeout {
            Some(t) => poll(t).context("Error polling terminal events")?,
            None => true,
        };

        if ready {
            events.push(read().context("Error reading terminal event")?);
            while poll(Duration::ZERO).context("Error polling terminal events")? {
                events.push(read().context("Error reading terminal event")?);
            }
        }

        Ok(events)
    }

    pub fn get_terminal_size(&self) -> Coords {
        (self.width, self.height)
    }

    pub fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        if self.has_message() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let center = (self.width / 2, self.height / 2);
        let top_left = (
            center.0.saturating_sub(msg_width / 2),
            center.1.saturating_sub(msg_height / 2),
        );

        queue!(
            self.stdout,
            style::SetForegroundColor(MESSAGE_FG),
            style::SetBackgroundColor(MESSAGE_BG)
        )?;

        for y_diff in 0..msg_height {
            let line = match y_diff {
                0 => "",
                n if n == msg_height - 1 => "",
                n => lines[n as usize - 1],
            };
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + y_diff;
            if y >= self.height {
                break;
            }
            queue!(self.stdout, cursor::MoveTo(top_left.0, y), style::Print(padded_line))?;
            self.forget_row(top_left.0, y, msg_width);
        }

        self.current_msg = Some(Message::new(msg_width, msg_height, top_left));
        self.flush()
    }

    /// Repaints whatever the message covered from the back buffer.
    pub fn hide_message(&mut self) -> Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };

        let top_left = msg.top_left();
        for y_diff in 0..msg.height() {
            self.forget_row(top_left.0, top_left.1 + y_diff, msg.width());
        }

        self.present()
    }

    pub fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All)).context("Error clearing")?;
        self.screen.iter_mut().for_each(|c| *c = Color::Reset);
        self.shown.iter_mut().for_each(|c| *c = None);
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush().context("Error flushing")
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn enter(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen, EnableMouseCapture)
            .context("Error entering alt screen")?;
        terminal::enable_raw_mode().context("Error enabling raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)
            .context("Error hiding cursor")?;
        self.clear()
    }

    fn index(&self, x: TermInt, y: TermInt) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(self.width as usize * y as usize + x as usize)
        } else {
            None
        }
    }

    // Marks cells as unknown so the next present repaints them
    fn forget_row(&mut self, x: TermInt, y: TermInt, width: TermInt) {
        for x_diff in 0..width {
            if let Some(i) = self.index(x + x_diff, y) {
                self.shown[i] = None;
            }
        }
    }
}

impl Canvas for TermManager {
    fn size(&self) -> Coords {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, top_left: Coords, width: TermInt, height: TermInt, color: Color) {
        for y in top_left.1..top_left.1.saturating_add(height) {
            for x in top_left.0..top_left.0.saturating_add(width) {
                if let Some(i) = self.index(x, y) {
                    self.screen[i] = color;
                }
            }
        }
    }

    fn present(&mut self) -> Result<()> {
        // Cells under an open message stay covered until it is hidden
        let covered = self.current_msg.as_ref().map(|m| (m.top_left(), m.width(), m.height()));

        for i in 0..self.screen.len() {
            let color = self.screen[i];
            if self.shown[i] == Some(color) {
                continue;
            }

            let x = (i % self.width as usize) as TermInt;
            let y = (i / self.width as usize) as TermInt;
            if let Some(((mx, my), mw, mh)) = covered {
                if x >= mx && x < mx + mw && y >= my && y < my + mh {
                    continue;
                }
            }

            queue!(
                self.stdout,
                cursor::MoveTo(x, y),
                style::SetBackgroundColor(color),
                style::Print(' ')
            )
            .context("Error drawing")?;
            self.shown[i] = Some(color);
        }

        self.flush()
    }
}

impl Message {
    pub fn new(width: TermInt, height: TermInt, top_left: Coords) -> Self {
        Message { width, height, top_left }
    }

    pub fn width(&self) -> TermInt {
        self.width
    }

    pub fn height(&self) -> TermInt {
        self.height
    }

    pub fn top_left(&self) -> Coords {
        self.top_left
    }
}

/// Runs `restore` if `result` failed. The original error wins over a failed restore.
fn restore_on_error<T>(result: Result<T>, restore: impl FnOnce() -> Result<()>) -> Result<T> {
    if result.is_err() {
        if let Err(err) = restore() {
            warn!("Failed to restore terminal: {:#}", err);
        }
    }
    result
}
