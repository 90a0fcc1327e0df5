use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::*;

use crate::model::ParamType;
use crate::ui::{AppState, ToastLevel};

pub fn help_text(editing: bool) -> &'static str {
    if editing {
        "type to edit  ←/→ move  Enter/Esc save  ↑/↓ select  Ctrl+S submit"
    } else {
        "↑/↓ select  Enter edit  s submit  r reset  q quit"
    }
}

pub(crate) fn draw_footer(f: &mut Frame, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let mut spans: Vec<Span> = Vec::new();
    if let Some(t) = &state.toast {
        let color = theme.toast_color(t.level);
        let tag = match t.level {
            ToastLevel::Success => "[OK]",
            ToastLevel::Error => "[ERROR]",
            ToastLevel::Info => "[INFO]",
        };
        spans.push(Span::styled(
            format!("{tag} "),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(t.text.clone(), Style::default().fg(color)));
        spans.push(Span::raw("  |  "));
    }
    let form = &state.form.form;
    if let Some(view) = form
        .selected_field()
        .and_then(|fld| form.field_view(fld.id()))
    {
        let kind = match view.param_type {
            ParamType::PlainText => "text",
            ParamType::TextList => "space-separated list",
        };
        let style = if view.edit_mode {
            theme.text_editing_bold()
        } else {
            theme.text_active_bold()
        };
        spans.push(Span::styled(format!("{}: {kind}", view.label), style));
        spans.push(Span::raw("  |  "));
    }
    let editing = form.fields().iter().filter(|fld| fld.edit_mode()).count();
    if editing > 0 {
        spans.push(Span::styled(
            format!("editing: {editing}"),
            Style::default().fg(Color::Magenta),
        ));
        spans.push(Span::raw("  |  "));
    }
    if form.is_dirty() {
        spans.push(Span::styled("modified", theme.text_editing_bold()));
        spans.push(Span::raw("  |  "));
    }
    spans.push(Span::styled(
        help_text(state.form.selected_editing()),
        theme.text_muted(),
    ));
    let p = Paragraph::new(Line::from(spans));
    f.render_widget(p, area);
}
