use ratatui::style::{Color, Modifier, Style};

// Palette
pub const BRAND: Color = Color::Rgb(72, 150, 160);
pub const OK: Color = Color::Rgb(110, 170, 100);
pub const KEY: Color = Color::Rgb(210, 170, 80);
pub const BAD: Color = Color::Rgb(200, 80, 70);
pub const DIM: Color = Color::Rgb(120, 124, 130);
pub const FOCUS_BG: Color = Color::Rgb(40, 52, 60);
pub const BAR_BG: Color = Color::Rgb(28, 32, 38);

pub fn title_style() -> Style {
    Style::new().fg(BRAND).add_modifier(Modifier::BOLD)
}

/// Focused input or button
pub fn selected_style() -> Style {
    Style::new().bg(FOCUS_BG).fg(Color::White).add_modifier(Modifier::BOLD)
}

pub fn text_style() -> Style {
    Style::new().fg(Color::White)
}

pub fn label_style() -> Style {
    Style::new().fg(BRAND)
}

pub fn muted_style() -> Style {
    Style::new().fg(DIM)
}

pub fn highlight_style() -> Style {
    Style::new().fg(KEY)
}

pub fn success_style() -> Style {
    Style::new().fg(OK)
}

pub fn error_style() -> Style {
    Style::new().fg(BAD)
}

pub fn border_style(focused: bool) -> Style {
    Style::new().fg(if focused { BRAND } else { DIM })
}

pub fn status_bar_style() -> Style {
    Style::new().bg(BAR_BG).fg(Color::White)
}

pub fn help_key_style() -> Style {
    highlight_style().add_modifier(Modifier::BOLD)
}

pub fn help_desc_style() -> Style {
    text_style()
}
