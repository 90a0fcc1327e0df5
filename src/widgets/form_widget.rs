use crate::app::Effect;
use crate::theme::Theme;
use crate::ui::ToastLevel;
use crate::widgets::field::FieldEditor;
use crate::widgets::form::{draw_form, ConfirmAction, FormEditor};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;

pub struct FormWidget {
    pub form: FormEditor,
}

impl FormWidget {
    pub fn new(form: FormEditor) -> Self {
        Self { form }
    }

    pub fn selected_editing(&self) -> bool {
        self.form
            .selected_field()
            .map(FieldEditor::edit_mode)
            .unwrap_or(false)
    }

    fn toggle_selected(&mut self) {
        if let Some(id) = self.form.selected_field().map(FieldEditor::id) {
            self.form.toggle_field(id);
        }
    }

    // Route a key into the selected field and coerce whatever it reports
    fn forward_to_field(&mut self, key: KeyEvent) {
        let Some(field) = self.form.selected_field_mut() else {
            return;
        };
        let id = field.id();
        if let Some(edit) = field.on_key(key) {
            // Dropped edits must not linger in the input buffer
            if !self.form.apply_edit(id, &edit.raw_text, edit.param_type) {
                self.form.resync_field(id);
            }
        }
    }

    fn submit(&self) -> Effect {
        Effect::SubmitSnapshot(self.form.snapshot_model())
    }
}

impl crate::widgets::Widget for FormWidget {
    fn render(&mut self, f: &mut Frame, area: Rect, focused: bool, tick: u64, theme: &Theme) {
        let cursor_on = tick % 2 == 0;
        draw_form(f, area, &self.form, focused, cursor_on, theme);
    }

    fn on_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        let mut effects: Vec<Effect> = Vec::new();
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => effects.push(Effect::Quit),
                KeyCode::Char('s') => effects.push(self.submit()),
                _ => {}
            }
            return effects;
        }
        // Two-step confirm for reset
        if self.form.confirm == Some(ConfirmAction::Reset) {
            match key.code {
                KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Enter => {
                    self.form.reset_to_initial();
                    effects.push(Effect::ShowToast {
                        text: "Reset".into(),
                        level: ToastLevel::Info,
                        seconds: 2,
                    });
                }
                _ => {
                    self.form.confirm = None;
                    self.form.message = None;
                }
            }
            return effects;
        }
        let editing = self.selected_editing();
        match key.code {
            KeyCode::Up => self.form.select_prev(),
            KeyCode::Down => self.form.select_next(),
            KeyCode::Enter => self.toggle_selected(),
            KeyCode::Esc if editing => self.toggle_selected(),
            _ if editing => self.forward_to_field(key),
            KeyCode::Char('k') => self.form.select_prev(),
            KeyCode::Char('j') => self.form.select_next(),
            KeyCode::Char('s') => effects.push(self.submit()),
            KeyCode::Char('r') | KeyCode::Char('R') => {
                if self.form.is_dirty() {
                    self.form.confirm = Some(ConfirmAction::Reset);
                    self.form.message =
                        Some("Press r or Enter to confirm Reset • Esc to cancel".into());
                } else {
                    self.form.message = Some("Nothing to reset".into());
                }
            }
            KeyCode::Char('q') => effects.push(Effect::Quit),
            KeyCode::Esc => self.form.message = None,
            _ => {}
        }
        effects
    }
}
