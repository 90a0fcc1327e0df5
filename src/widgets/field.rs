use crate::model::{ParamType, ParameterDefinition, TagColor};
use crate::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use tui_textarea::{CursorMove, TextArea};

pub const EDIT_LABEL: &str = "edit";
pub const SAVE_LABEL: &str = "save";

/// Raw text reported by a field, untouched, together with the field's type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawEdit {
    pub raw_text: String,
    pub param_type: ParamType,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldView {
    pub id: i64,
    pub label: String,
    pub param_type: ParamType,
    pub value: String,
    pub edit_mode: bool,
}

pub fn button_text(edit_mode: bool) -> &'static str {
    if edit_mode {
        SAVE_LABEL
    } else {
        EDIT_LABEL
    }
}

/// One parameter row. Knows nothing about list semantics: it holds the edit
/// flag and a single-line input buffer, and reports text changes upward.
pub struct FieldEditor {
    definition: ParameterDefinition,
    edit_mode: bool,
    input: TextArea<'static>,
}

impl FieldEditor {
    pub fn new(definition: ParameterDefinition) -> Self {
        Self {
            definition,
            edit_mode: false,
            input: TextArea::default(),
        }
    }

    pub fn id(&self) -> i64 {
        self.definition.id
    }

    pub fn definition(&self) -> &ParameterDefinition {
        &self.definition
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn toggle_edit_mode(&mut self) {
        self.edit_mode = !self.edit_mode;
    }

    /// Load the text the input starts from when the field enters edit mode.
    pub fn seed_input(&mut self, value: &str) {
        let mut ta = TextArea::new(vec![value.to_string()]);
        ta.move_cursor(CursorMove::End);
        self.input = ta;
    }

    pub fn input_text(&self) -> &str {
        self.input.lines().first().map(String::as_str).unwrap_or("")
    }

    pub fn cursor_col(&self) -> usize {
        self.input.cursor().1
    }

    pub fn on_user_input(&self, raw_text: impl Into<String>) -> Option<RawEdit> {
        if !self.edit_mode {
            return None;
        }
        Some(RawEdit {
            raw_text: raw_text.into(),
            param_type: self.definition.param_type,
        })
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Option<RawEdit> {
        if !self.edit_mode {
            return None;
        }
        let accepted = match key.code {
            KeyCode::Char(_) => !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT),
            KeyCode::Backspace
            | KeyCode::Delete
            | KeyCode::Left
            | KeyCode::Right
            | KeyCode::Home
            | KeyCode::End => true,
            _ => false,
        };
        // Enter and friends never reach the buffer, so it stays one line
        if !accepted || !self.input.input(key) {
            return None;
        }
        let text = self.input_text().to_string();
        self.on_user_input(text)
    }

    pub fn view(&self, value: String) -> FieldView {
        FieldView {
            id: self.definition.id,
            label: self.definition.name.clone(),
            param_type: self.definition.param_type,
            value,
            edit_mode: self.edit_mode,
        }
    }

    pub fn render(
        &self,
        value: &str,
        selected: bool,
        cursor_on: bool,
        tag: Option<TagColor>,
        theme: &Theme,
    ) -> Line<'static> {
        let marker = if selected { '›' } else { ' ' };
        let mut label_style = Style::default();
        if let Some(c) = tag {
            label_style = label_style.fg(theme.tag_color(c));
        }
        let mut shown = value.to_string();
        if self.edit_mode && selected && cursor_on {
            let at = shown
                .char_indices()
                .nth(self.cursor_col())
                .map(|(i, _)| i)
                .unwrap_or(shown.len());
            shown.insert(at, '▏');
        }
        let value_style = match (selected, self.edit_mode) {
            (true, true) => theme.text_editing_bold(),
            (true, false) => theme.text_active_bold(),
            _ => Style::default(),
        };
        let button_style = if selected {
            theme.list_cursor_style()
        } else {
            theme.text_muted()
        };
        Line::from(vec![
            Span::raw(format!("{marker} ")),
            Span::styled(self.definition.name.clone(), label_style),
            Span::raw(": "),
            Span::styled(shown, value_style),
            Span::raw("  "),
            Span::styled(format!("[{}]", button_text(self.edit_mode)), button_style),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(param_type: ParamType) -> FieldEditor {
        FieldEditor::new(ParameterDefinition {
            id: 7,
            name: "Purpose".into(),
            param_type,
        })
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn toggling_twice_restores_display_mode() {
        let mut f = field(ParamType::PlainText);
        assert!(!f.edit_mode());
        f.toggle_edit_mode();
        assert!(f.edit_mode());
        f.toggle_edit_mode();
        assert!(!f.edit_mode());
    }

    #[test]
    fn user_input_is_forwarded_verbatim_only_in_edit_mode() {
        let mut f = field(ParamType::TextList);
        assert_eq!(f.on_user_input(" a  b "), None);
        f.toggle_edit_mode();
        assert_eq!(
            f.on_user_input(" a  b "),
            Some(RawEdit {
                raw_text: " a  b ".into(),
                param_type: ParamType::TextList,
            })
        );
    }

    #[test]
    fn typing_reports_the_whole_buffer() {
        let mut f = field(ParamType::PlainText);
        f.toggle_edit_mode();
        f.seed_input("casua");
        let edit = f.on_key(key(KeyCode::Char('l'))).unwrap();
        assert_eq!(edit.raw_text, "casual");
        let edit = f.on_key(key(KeyCode::Backspace)).unwrap();
        assert_eq!(edit.raw_text, "casua");
    }

    #[test]
    fn keys_outside_edit_mode_are_ignored() {
        let mut f = field(ParamType::PlainText);
        f.seed_input("x");
        assert_eq!(f.on_key(key(KeyCode::Char('y'))), None);
        assert_eq!(f.input_text(), "x");
    }

    #[test]
    fn cursor_moves_and_control_chords_report_nothing() {
        let mut f = field(ParamType::PlainText);
        f.toggle_edit_mode();
        f.seed_input("ab");
        assert_eq!(f.on_key(key(KeyCode::Left)), None);
        assert_eq!(f.cursor_col(), 1);
        assert_eq!(
            f.on_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            None
        );
        assert_eq!(f.on_key(key(KeyCode::Enter)), None);
        let edit = f.on_key(key(KeyCode::Char('X'))).unwrap();
        assert_eq!(edit.raw_text, "aXb");
    }

    #[test]
    fn render_shows_mode_button() {
        let theme = Theme::default();
        let mut f = field(ParamType::PlainText);
        let line = f.render("casual", false, true, None, &theme);
        assert_eq!(text(&line), "  Purpose: casual  [edit]");
        f.toggle_edit_mode();
        f.seed_input("casual");
        let line = f.render("casual", true, true, Some(TagColor::Blue), &theme);
        assert_eq!(text(&line), "› Purpose: casual▏  [save]");
        let line = f.render("casual", true, false, None, &theme);
        assert_eq!(text(&line), "› Purpose: casual  [save]");
    }

    #[test]
    fn view_carries_definition_and_mode() {
        let f = field(ParamType::TextList);
        let v = f.view(String::new());
        assert_eq!(v.id, 7);
        assert_eq!(v.label, "Purpose");
        assert_eq!(v.value, "");
        assert!(!v.edit_mode);
    }
}
