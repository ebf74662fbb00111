use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::forms::LoginField;
use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;

use super::{button_line, field_error_lines, field_line, message_line, other_error_lines};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.login;
    let mut lines = vec![Line::from("")];

    if let Some(ref notice) = form.notice {
        lines.push(message_line(notice, styles::success_style()));
        lines.push(Line::from(""));
    }

    lines.push(field_line(
        "Email",
        &form.email,
        form.focus == LoginField::Email,
        false,
    ));
    lines.extend(field_error_lines(&form.field_errors, "email"));
    lines.push(field_line(
        "Password",
        &form.password,
        form.focus == LoginField::Password,
        true,
    ));
    lines.extend(field_error_lines(&form.field_errors, "password"));
    lines.extend(other_error_lines(&form.field_errors, &["email", "password"]));

    lines.push(Line::from(""));
    lines.push(button_line("Login", form.focus == LoginField::Submit));

    if let Some(ref error) = form.error {
        lines.push(Line::from(""));
        lines.push(message_line(error, styles::error_style()));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  No account? Press ", styles::muted_style()),
        Span::styled("Ctrl+R", styles::help_key_style()),
        Span::styled(" to register", styles::muted_style()),
    ]));

    let height = lines.len() as u16 + 2;
    let block = Block::default()
        .title(Span::styled(" Log in ", styles::title_style()))
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(
        Paragraph::new(lines).block(block),
        centered_rect_fixed(60, height, area),
    );
}
