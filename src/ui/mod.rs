//! Terminal User Interface module.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard and mouse dispatch
//! - `render` - Card layout and overlay dispatch
//! - `cards` - One renderer per media variant
//! - `status` - Status bar widget
//! - `help` - Keybinding overlay

mod cards;
mod help;
mod input;
mod loop_runner;
mod render;
mod status;

pub use cards::{render_card, CardProps};
pub use loop_runner::{run, Action};
