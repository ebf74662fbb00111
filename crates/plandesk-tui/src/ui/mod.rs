//! Terminal UI module using ratatui.
//!
//! - `render`: frame layout, title/status bars and overlays
//! - `input`: keyboard event handling
//! - `styles`: colors and text styles
//! - `screens`: login, registration and profile screens

pub mod input;
pub mod render;
pub mod screens;
pub mod styles;
