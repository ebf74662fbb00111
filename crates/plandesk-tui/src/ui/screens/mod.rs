//! Screen renderers, one per route.

pub mod login;
pub mod profile;
pub mod register;

use ratatui::text::{Line, Span};

use plandesk_core::models::FieldErrors;

use super::styles;

/// Width of the input box in form lines
const INPUT_WIDTH: usize = 28;

/// Width of the label column in form lines
const LABEL_WIDTH: usize = 15;

/// Keep the tail of `value` so the cursor end stays visible
fn fit(value: &str, width: usize) -> String {
    let count = value.chars().count();
    if count <= width {
        format!("{:<width$}", value, width = width)
    } else {
        value.chars().skip(count - width).collect()
    }
}

/// One labeled input: `Label: [value▌]`
pub fn field_line<'a>(label: &str, value: &str, focused: bool, masked: bool) -> Line<'a> {
    let shown = if masked {
        "*".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    let cursor = if focused { "▌" } else { " " };
    let style = if focused {
        styles::selected_style()
    } else {
        styles::text_style()
    };

    Line::from(vec![
        Span::styled(
            format!("  {:>width$}: [", label, width = LABEL_WIDTH),
            styles::muted_style(),
        ),
        Span::styled(format!("{}{}", fit(&shown, INPUT_WIDTH), cursor), style),
        Span::styled("]", styles::muted_style()),
    ])
}

pub fn button_line<'a>(label: &str, focused: bool) -> Line<'a> {
    let padding = " ".repeat(LABEL_WIDTH + 6);
    if focused {
        Line::from(vec![
            Span::raw(format!("{}[", padding)),
            Span::styled(format!(" ▶ {} ◀ ", label), styles::selected_style()),
            Span::raw("]"),
        ])
    } else {
        Line::from(vec![
            Span::raw(format!("{}[", padding)),
            Span::styled(format!("   {}   ", label), styles::text_style()),
            Span::raw("]"),
        ])
    }
}

/// The messages for `field`, indented under its input
pub fn field_error_lines<'a>(errors: &FieldErrors, field: &str) -> Vec<Line<'a>> {
    errors
        .get(field)
        .unwrap_or_default()
        .iter()
        .map(|msg| {
            Line::from(Span::styled(
                format!("{}{}", " ".repeat(LABEL_WIDTH + 5), msg),
                styles::error_style(),
            ))
        })
        .collect()
}

/// Messages for fields the form does not show (e.g. `non_field_errors`)
pub fn other_error_lines<'a>(errors: &FieldErrors, shown: &[&str]) -> Vec<Line<'a>> {
    errors
        .iter()
        .filter(|(field, _)| !shown.contains(field))
        .flat_map(|(field, messages)| {
            messages
                .iter()
                .map(move |msg| {
                    Line::from(Span::styled(format!("  {}: {}", field, msg), styles::error_style()))
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

pub fn message_line<'a>(message: &str, style: ratatui::style::Style) -> Line<'a> {
    Line::from(Span::styled(format!("  {}", message), style))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_pads_short_values() {
        assert_eq!(fit("abc", 5), "abc  ");
    }

    #[test]
    fn test_fit_keeps_tail_of_long_values() {
        assert_eq!(fit("abcdefgh", 3), "fgh");
        assert_eq!(fit("ééééé", 2), "éé");
    }

    #[test]
    fn test_field_error_lines() {
        let mut errors = FieldErrors::new();
        errors.add("email", "Enter a valid email address.");
        errors.add("non_field_errors", "Something else");

        assert_eq!(field_error_lines(&errors, "email").len(), 1);
        assert!(field_error_lines(&errors, "password").is_empty());
        assert_eq!(other_error_lines(&errors, &["email"]).len(), 1);
    }
}
