use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use plandesk_core::Route;

use crate::app::{App, AppState};

use super::screens::{login, profile, register};
use super::styles;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_main_content(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!("  plandesk · {}", app.route.title());
    let right = match app.user {
        Some(ref user) => format!("{} <{}>  [F1] Help", user.full_name(), user.email()),
        None => "[F1] Help".to_string(),
    };

    let padding = (area.width as usize)
        .saturating_sub(title.chars().count() + right.chars().count() + 2);

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(padding)),
        Span::styled(right, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.route {
        Route::Login => login::render(frame, app, area),
        Route::Register => register::render(frame, app, area),
        Route::Profile => profile::render(frame, app, area),
    }
}

fn shortcuts(app: &App) -> &'static str {
    match app.route {
        Route::Login => "[Tab] next | [Enter] submit | [Ctrl+R] register | [Esc] quit",
        Route::Register => "[Tab] next | [Enter] submit | [Esc] back to login",
        Route::Profile if app.profile.editing => "[Tab] next | [Enter] next/save | [Esc] cancel",
        Route::Profile => "[e]dit | [r]eload | [l]ogout | [q]uit",
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let left_text = match app.status_message {
        Some(ref msg) => format!(" {} ", msg),
        None => format!(" {} ", app.session.api().base_url()),
    };
    let right_text = format!(" {} ", shortcuts(app));

    let padding_len = (area.width as usize)
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.chars().count());

    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    frame.render_widget(
        Paragraph::new(status_line).style(styles::status_bar_style()),
        area,
    );
}

fn help_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 24, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled("  plandesk", styles::title_style())),
        Line::from(Span::styled(
            format!("  version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Forms", styles::highlight_style())),
        help_line("Tab/↓", "Next field"),
        help_line("S-Tab/↑", "Previous field"),
        help_line("Enter", "Next field / submit"),
        help_line("Ctrl+S", "Save profile while editing"),
        help_line("Ctrl+R", "Register (from login)"),
        help_line("Esc", "Back / cancel"),
        Line::from(""),
        Line::from(Span::styled(" Profile", styles::highlight_style())),
        help_line("e", "Edit profile"),
        help_line("r", "Reload profile"),
        help_line("l", "Log out"),
        help_line("?", "This help"),
        help_line("q", "Quit"),
        Line::from(""),
        help_line("Ctrl+C", "Quit immediately"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("F1", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
