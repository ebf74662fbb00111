use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use plandesk_core::models::UserWithProfile;

use crate::app::App;
use crate::forms::{FieldCycle, ProfileField, ProfileForm};
use crate::ui::styles;

use super::{button_line, field_error_lines, field_line, message_line, other_error_lines};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.profile;

    let Some(ref user) = form.user else {
        let mut lines = vec![Line::from("")];
        match form.error {
            Some(ref error) => lines.push(message_line(error, styles::error_style())),
            None => lines.push(message_line("Loading profile...", styles::muted_style())),
        }
        lines.push(Line::from(""));
        lines.push(message_line("[r] retry  [l] logout", styles::muted_style()));
        let block = Block::default()
            .title(Span::styled(" Profile ", styles::title_style()))
            .borders(Borders::ALL)
            .border_style(styles::border_style(false));
        frame.render_widget(Paragraph::new(lines).block(block), area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    render_account(frame, user, chunks[0]);
    if form.editing {
        render_edit_form(frame, form, chunks[1]);
    } else {
        render_details(frame, form, user, chunks[1]);
    }
}

fn detail_line<'a>(label: &str, value: String) -> Line<'a> {
    let value_style = if value.is_empty() {
        styles::muted_style()
    } else {
        styles::text_style()
    };
    let value = if value.is_empty() { "-".to_string() } else { value };
    Line::from(vec![
        Span::styled(format!("  {:<14}", label), styles::label_style()),
        Span::styled(value, value_style),
    ])
}

fn render_account(frame: &mut Frame, user: &UserWithProfile, area: Rect) {
    let account = &user.user;
    let lines = vec![
        Line::from(""),
        detail_line("Email", account.email.clone()),
        detail_line("Mobile", account.mobile.clone()),
        detail_line(
            "Status",
            if account.is_active { "Active" } else { "Inactive" }.to_string(),
        ),
        detail_line("Staff", if account.is_staff { "Yes" } else { "No" }.to_string()),
        detail_line(
            "Member since",
            account.created_at.format("%Y-%m-%d").to_string(),
        ),
    ];

    let block = Block::default()
        .title(Span::styled(" Account ", styles::title_style()))
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_details(frame: &mut Frame, form: &ProfileForm, user: &UserWithProfile, area: Rect) {
    let profile = &user.profile;
    let mut lines = vec![
        Line::from(""),
        detail_line("Full name", profile.full_name.clone()),
        detail_line(
            "Date of birth",
            profile
                .date_of_birth
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        ),
        detail_line(
            "Gender",
            profile.gender.map(|g| g.to_string()).unwrap_or_default(),
        ),
        detail_line("Address", profile.address_display()),
        detail_line(
            "Updated",
            profile.updated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        ),
        Line::from(""),
    ];

    if let Some(ref success) = form.success {
        lines.push(message_line(success, styles::success_style()));
    }
    if let Some(ref error) = form.error {
        lines.push(message_line(error, styles::error_style()));
    }

    let block = Block::default()
        .title(Span::styled(" Profile ", styles::title_style()))
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn render_edit_form(frame: &mut Frame, form: &ProfileForm, area: Rect) {
    let mut lines = vec![Line::from("")];
    let mut shown = Vec::new();

    for &field in ProfileField::ORDER {
        if field == ProfileField::Save {
            continue;
        }
        let focused = form.focus == field;
        lines.push(field_line(field.label(), form.value(field), focused, false));
        if focused {
            if let Some(hint) = field.hint() {
                lines.push(Line::from(Span::styled(
                    format!("{}{}", " ".repeat(20), hint),
                    styles::muted_style(),
                )));
            }
        }
        lines.extend(field_error_lines(&form.field_errors, field.key()));
        shown.push(field.key());
    }
    lines.extend(other_error_lines(&form.field_errors, &shown));

    lines.push(Line::from(""));
    lines.push(button_line(
        ProfileField::Save.label(),
        form.focus == ProfileField::Save,
    ));

    if let Some(ref error) = form.error {
        lines.push(Line::from(""));
        lines.push(message_line(error, styles::error_style()));
    }

    let block = Block::default()
        .title(Span::styled(" Edit profile ", styles::title_style()))
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
