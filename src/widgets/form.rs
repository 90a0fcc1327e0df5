use crate::form_core::session::{display_value, EditSession};
use crate::model::{ColorTag, Model, ParamType, ParameterDefinition, TagColor};
use crate::theme::Theme;
use crate::widgets::chrome::panel_block;
use crate::widgets::field::{FieldEditor, FieldView};
use ratatui::prelude::*;
use ratatui::widgets::*;
use tracing::{debug, info};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfirmAction {
    Reset,
}

/// Owns the edit session and one `FieldEditor` per definition.
///
/// Not a controlled component: the session is seeded from the model given to
/// `new` and only ever re-synced through `reset_session`.
pub struct FormEditor {
    pub title: String,
    definitions: Vec<ParameterDefinition>,
    session: EditSession,
    colors: Vec<ColorTag>,
    baseline: Model,
    fields: Vec<FieldEditor>,
    pub selected: usize,
    pub message: Option<String>,
    pub confirm: Option<ConfirmAction>,
}

impl FormEditor {
    pub fn new(
        title: impl Into<String>,
        definitions: Vec<ParameterDefinition>,
        initial: Model,
    ) -> Self {
        let fields = definitions.iter().cloned().map(FieldEditor::new).collect();
        Self {
            title: title.into(),
            session: EditSession::new(initial.values.clone()),
            colors: initial.colors.clone(),
            baseline: initial,
            definitions,
            fields,
            selected: 0,
            message: None,
            confirm: None,
        }
    }

    pub fn definitions(&self) -> &[ParameterDefinition] {
        &self.definitions
    }

    pub fn fields(&self) -> &[FieldEditor] {
        &self.fields
    }

    pub fn field(&self, param_id: i64) -> Option<&FieldEditor> {
        self.fields.iter().find(|f| f.id() == param_id)
    }

    pub fn field_mut(&mut self, param_id: i64) -> Option<&mut FieldEditor> {
        self.fields.iter_mut().find(|f| f.id() == param_id)
    }

    pub fn selected_field(&self) -> Option<&FieldEditor> {
        self.fields.get(self.selected)
    }

    pub fn selected_field_mut(&mut self) -> Option<&mut FieldEditor> {
        self.fields.get_mut(self.selected)
    }

    pub fn any_editing(&self) -> bool {
        self.fields.iter().any(FieldEditor::edit_mode)
    }

    /// Coerce a raw field edit into the session. Unknown ids are ignored.
    /// Returns false when the edit was dropped because no value record
    /// exists for `param_id`.
    pub fn apply_edit(&mut self, param_id: i64, raw_text: &str, param_type: ParamType) -> bool {
        let applied = self.session.apply(param_id, raw_text, param_type);
        if applied {
            debug!(param_id, ?param_type, raw = raw_text, "edit applied");
        } else {
            debug!(param_id, "edit ignored: no value record for id");
        }
        applied
    }

    /// Re-seed a field's input buffer from the session value.
    pub fn resync_field(&mut self, param_id: i64) {
        let Some(shown) = self
            .field(param_id)
            .map(|fld| self.display_string(fld.definition()))
        else {
            return;
        };
        if let Some(field) = self.field_mut(param_id) {
            field.seed_input(&shown);
        }
    }

    /// Text handed to the field for `def`: empty when no value exists, lists
    /// joined with the delimiter.
    pub fn display_string(&self, def: &ParameterDefinition) -> String {
        self.session
            .value_for(def.id)
            .map(display_value)
            .unwrap_or_default()
    }

    pub fn field_view(&self, param_id: i64) -> Option<FieldView> {
        let def = self.definitions.iter().find(|d| d.id == param_id)?;
        let field = self.field(param_id)?;
        Some(field.view(self.display_string(def)))
    }

    pub fn render_fields(&self) -> Vec<FieldView> {
        self.fields
            .iter()
            .map(|f| f.view(self.display_string(f.definition())))
            .collect()
    }

    pub fn toggle_field(&mut self, param_id: i64) {
        let Some(def) = self.definitions.iter().find(|d| d.id == param_id) else {
            return;
        };
        let current = self.display_string(def);
        if let Some(field) = self.field_mut(param_id) {
            field.toggle_edit_mode();
            if field.edit_mode() {
                field.seed_input(&current);
            }
            debug!(param_id, editing = field.edit_mode(), "field toggled");
        }
    }

    pub fn snapshot_model(&self) -> Model {
        Model {
            values: self.session.values().to_vec(),
            colors: self.colors.clone(),
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.session.values() != self.baseline.values.as_slice()
    }

    /// Explicit re-sync from an external model. Becomes the new baseline and
    /// drops every field back to display mode.
    pub fn reset_session(&mut self, model: Model) {
        self.session.replace(model.values.clone());
        self.colors = model.colors.clone();
        self.baseline = model;
        for f in &mut self.fields {
            if f.edit_mode() {
                f.toggle_edit_mode();
            }
        }
        self.confirm = None;
        info!(values = self.baseline.values.len(), "session reset");
    }

    pub fn reset_to_initial(&mut self) {
        self.reset_session(self.baseline.clone());
        self.message = Some("Reset to initial values".into());
    }

    pub fn color_of(&self, param_id: i64) -> Option<TagColor> {
        self.colors
            .iter()
            .find(|c| c.param_id == param_id)
            .map(|c| c.color)
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.fields.len() {
            self.selected += 1;
        }
    }
}

pub fn draw_form(
    f: &mut Frame,
    area: Rect,
    form: &FormEditor,
    highlight: bool,
    cursor_on: bool,
    theme: &Theme,
) {
    let mut lines: Vec<Line> = Vec::new();
    for (i, (fld, view)) in form.fields.iter().zip(form.render_fields()).enumerate() {
        lines.push(fld.render(
            &view.value,
            i == form.selected,
            cursor_on,
            form.color_of(view.id),
            theme,
        ));
    }
    if form.fields.is_empty() {
        lines.push(Line::from(Span::styled(
            "No parameters defined",
            theme.text_muted(),
        )));
    }
    if let Some(msg) = &form.message {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(msg.clone(), theme.text_muted())));
    }
    let title = if form.is_dirty() {
        format!("{} *", form.title)
    } else {
        form.title.clone()
    };
    let block = panel_block(&title, highlight, theme);
    let p = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(p, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ParamValue, ParameterValue};
    use pretty_assertions::assert_eq;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn def(id: i64, name: &str, param_type: ParamType) -> ParameterDefinition {
        ParameterDefinition {
            id,
            name: name.into(),
            param_type,
        }
    }

    fn sample() -> FormEditor {
        FormEditor::new(
            "Parameters",
            vec![
                def(1, "Purpose", ParamType::PlainText),
                def(2, "Length", ParamType::PlainText),
                def(3, "List", ParamType::TextList),
            ],
            Model {
                values: vec![
                    ParameterValue::scalar(1, "casual"),
                    ParameterValue::scalar(2, "maxi"),
                    ParameterValue::list(3, ["a", "b", "c"]),
                ],
                colors: vec![ColorTag {
                    param_id: 1,
                    color: TagColor::Blue,
                }],
            },
        )
    }

    #[test]
    fn plain_edit_shows_up_in_snapshot() {
        let mut form = sample();
        form.apply_edit(1, "formal", ParamType::PlainText);
        assert_eq!(
            form.snapshot_model().values,
            vec![
                ParameterValue::scalar(1, "formal"),
                ParameterValue::scalar(2, "maxi"),
                ParameterValue::list(3, ["a", "b", "c"]),
            ]
        );
        assert!(form.is_dirty());
    }

    #[test]
    fn list_edit_is_split() {
        let mut form = sample();
        form.apply_edit(3, "x y z", ParamType::TextList);
        let snap = form.snapshot_model();
        assert_eq!(snap.values[2], ParameterValue::list(3, ["x", "y", "z"]));
    }

    #[test]
    fn unknown_id_leaves_values_unchanged() {
        let mut form = sample();
        let before = form.snapshot_model();
        form.apply_edit(99, "anything", ParamType::PlainText);
        assert_eq!(form.snapshot_model(), before);
        assert!(!form.is_dirty());
    }

    #[test]
    fn colors_pass_through_every_edit() {
        let mut form = sample();
        let colors = form.snapshot_model().colors;
        form.apply_edit(1, "a", ParamType::PlainText);
        form.apply_edit(3, " ", ParamType::TextList);
        form.toggle_field(2);
        assert_eq!(form.snapshot_model().colors, colors);
        assert_eq!(form.color_of(1), Some(TagColor::Blue));
        assert_eq!(form.color_of(2), None);
    }

    #[test]
    fn definition_without_value_renders_empty() {
        let form = FormEditor::new(
            "t",
            vec![def(5, "Missing", ParamType::PlainText)],
            Model::default(),
        );
        assert_eq!(form.field_view(5).unwrap().value, "");
    }

    #[test]
    fn edits_for_a_valueless_definition_are_dropped() {
        let mut form = FormEditor::new(
            "t",
            vec![def(5, "Missing", ParamType::PlainText)],
            Model::default(),
        );
        assert!(!form.apply_edit(5, "hello", ParamType::PlainText));
        assert!(form.snapshot_model().values.is_empty());
    }

    #[test]
    fn values_for_unknown_ids_are_carried_not_rendered() {
        let mut model = sample().snapshot_model();
        model.values.push(ParameterValue::scalar(42, "hidden"));
        let form = FormEditor::new("t", vec![def(1, "Purpose", ParamType::PlainText)], model);
        let views = form.render_fields();
        assert_eq!(views.len(), 1);
        assert!(views.iter().all(|v| v.value != "hidden"));
        assert!(form
            .snapshot_model()
            .values
            .contains(&ParameterValue::scalar(42, "hidden")));
    }

    #[test]
    fn render_fields_joins_lists_in_definition_order() {
        let form = sample();
        let values: Vec<String> = form.render_fields().into_iter().map(|v| v.value).collect();
        assert_eq!(values, vec!["casual", "maxi", "a b c"]);
    }

    #[test]
    fn shape_mismatches_still_render() {
        let form = FormEditor::new(
            "t",
            vec![
                def(1, "P", ParamType::PlainText),
                def(2, "L", ParamType::TextList),
            ],
            Model {
                values: vec![
                    ParameterValue::list(1, ["u", "v"]),
                    ParameterValue::scalar(2, "w x"),
                ],
                colors: vec![],
            },
        );
        assert_eq!(form.field_view(1).unwrap().value, "u v");
        assert_eq!(form.field_view(2).unwrap().value, "w x");
    }

    #[test]
    fn toggling_one_field_leaves_others_alone() {
        let mut form = sample();
        form.toggle_field(2);
        let modes: Vec<bool> = form.render_fields().iter().map(|v| v.edit_mode).collect();
        assert_eq!(modes, vec![false, true, false]);
        assert_eq!(form.field(2).unwrap().input_text(), "maxi");
        form.toggle_field(2);
        assert!(!form.any_editing());
        assert_eq!(form.field_view(2).unwrap().value, "maxi");
    }

    #[test]
    fn toggle_seeds_list_fields_with_joined_text() {
        let mut form = sample();
        form.toggle_field(3);
        assert_eq!(form.field(3).unwrap().input_text(), "a b c");
    }

    #[test]
    fn reset_session_resyncs_and_leaves_edit_mode() {
        let mut form = sample();
        form.toggle_field(1);
        form.apply_edit(1, "formal", ParamType::PlainText);
        let fresh = Model {
            values: vec![ParameterValue::scalar(1, "sport")],
            colors: vec![],
        };
        form.reset_session(fresh.clone());
        assert_eq!(form.snapshot_model(), fresh);
        assert!(!form.any_editing());
        assert!(!form.is_dirty());
    }

    #[test]
    fn reset_to_initial_discards_edits() {
        let mut form = sample();
        let initial = form.snapshot_model();
        form.apply_edit(3, "q", ParamType::TextList);
        form.reset_to_initial();
        assert_eq!(form.snapshot_model(), initial);
        assert!(form.message.is_some());
    }

    #[test]
    fn snapshot_is_a_pure_read() {
        let form = sample();
        assert_eq!(form.snapshot_model(), form.snapshot_model());
        assert_eq!(
            form.snapshot_model().values[2].value,
            ParamValue::List(vec!["a".into(), "b".into(), "c".into()])
        );
    }

    #[test]
    fn draw_form_renders_rows() {
        let mut form = sample();
        form.apply_edit(2, "midi", ParamType::PlainText);
        let backend = TestBackend::new(40, 8);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::default();
        terminal
            .draw(|f| {
                let area = f.area();
                draw_form(f, area, &form, true, false, &theme);
            })
            .unwrap();
        let buf = terminal.backend().buffer().clone();
        let mut rows: Vec<String> = Vec::new();
        for y in 0..buf.area.height {
            let mut line = String::new();
            for x in 0..buf.area.width {
                line.push_str(buf[(x, y)].symbol());
            }
            rows.push(line.trim_end().to_string());
        }
        assert!(rows[0].contains("Parameters *"));
        assert!(rows[1].starts_with("│› Purpose: casual  [edit]"));
        assert!(rows[2].starts_with("│  Length: midi  [edit]"));
        assert!(rows[3].starts_with("│  List: a b c  [edit]"));
    }
}
