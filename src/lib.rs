pub mod config;
pub mod engine;
pub mod game;
pub mod input;
pub mod render;
pub mod scheduler;
pub mod snake;
pub mod term;

pub type TermInt = u16;
pub type Coords = (TermInt, TermInt);
