use anyhow::Result;
use crossterm::style::Color;
use rand::Rng;

use crate::{Coords, TermInt};
use crate::config::Config;
use crate::engine::Engine;
use crate::snake::Cell;

/// A raster surface that can paint solid rectangles.
pub trait Canvas {
    fn size(&self) -> Coords;
    fn fill_rect(&mut self, top_left: Coords, width: TermInt, height: TermInt, color: Color);
    fn present(&mut self) -> Result<()>;
}

pub struct Palette {
    pub background: Color,
    pub body: Color,
    pub food: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Palette { background: Color::Black, body: Color::Green, food: Color::Red }
    }
}

/// Size of one grid cell on the surface.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CellLayout {
    pub width: TermInt,
    pub height: TermInt,
}

impl CellLayout {
    pub fn origin_of(&self, cell: Cell) -> (i32, i32) {
        (cell.x * self.width as i32, cell.y * self.height as i32)
    }
}

impl From<&Config> for CellLayout {
    fn from(config: &Config) -> Self {
        CellLayout { width: config.cell_width.max(1), height: config.cell_height.max(1) }
    }
}

pub fn draw_frame<R: Rng>(
    engine: &Engine<R>,
    canvas: &mut impl Canvas,
    layout: CellLayout,
    palette: &Palette,
) -> Result<()> {
    let (width, height) = canvas.size();
    canvas.fill_rect((0, 0), width, height, palette.background);

    for segment in engine.snake().body() {
        fill_cell(canvas, layout, *segment, palette.body);
    }
    fill_cell(canvas, layout, engine.food(), palette.food);

    canvas.present()
}

fn fill_cell(canvas: &mut impl Canvas, layout: CellLayout, cell: Cell, color: Color) {
    let (x, y) = layout.origin_of(cell);
    let (width, height) = canvas.size();

    // Off-surface cells (a crashed head) are skipped rather than partially drawn
    let (right, bottom) = (x + layout.width as i32, y + layout.height as i32);
    if x < 0 || y < 0 || right > width as i32 || bottom > height as i32 {
        return;
    }

    canvas.fill_rect((x as TermInt, y as TermInt), layout.width, layout.height, color);
}
