use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::forms::{FieldCycle, RegisterField};
use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;

use super::{button_line, field_error_lines, field_line, message_line, other_error_lines};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.register;
    let mut lines = vec![Line::from("")];

    let mut shown = Vec::new();
    for &field in RegisterField::ORDER {
        if field == RegisterField::Submit {
            continue;
        }
        lines.push(field_line(
            field.label(),
            form.value(field),
            form.focus == field,
            field == RegisterField::Password,
        ));
        lines.extend(field_error_lines(&form.field_errors, field.key()));
        shown.push(field.key());
    }
    lines.extend(other_error_lines(&form.field_errors, &shown));

    lines.push(Line::from(""));
    lines.push(button_line(
        RegisterField::Submit.label(),
        form.focus == RegisterField::Submit,
    ));

    if let Some(ref error) = form.error {
        lines.push(Line::from(""));
        lines.push(message_line(error, styles::error_style()));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Already registered? Press ", styles::muted_style()),
        Span::styled("Esc", styles::help_key_style()),
        Span::styled(" to log in", styles::muted_style()),
    ]));

    let height = lines.len() as u16 + 2;
    let block = Block::default()
        .title(Span::styled(" Create account ", styles::title_style()))
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(
        Paragraph::new(lines).block(block),
        centered_rect_fixed(60, height, area),
    );
}
