use crate::model::Model;
use crate::ui::{AppState, ToastLevel};
use crate::widgets::Widget;
use crossterm::event::KeyEvent;
use std::path::PathBuf;

pub enum AppMsg {
    Key(KeyEvent),
    SnapshotSubmitted {
        path: Option<PathBuf>,
        outcome: Result<(), String>,
    },
}

pub enum Effect {
    SubmitSnapshot(Model),
    ShowToast {
        text: String,
        level: ToastLevel,
        seconds: u64,
    },
    Quit,
}

pub fn update(state: &mut AppState, msg: AppMsg) -> Vec<Effect> {
    use AppMsg::*;
    let mut effects: Vec<Effect> = Vec::new();
    match msg {
        Key(key) => {
            let was_dirty = state.form.form.is_dirty();
            effects.extend(state.form.on_key(key));
            if state.form.form.is_dirty() != was_dirty {
                state.dbg(format!("dirty: {}", state.form.form.is_dirty()));
            }
        }
        SnapshotSubmitted { path, outcome } => match (path, outcome) {
            (Some(path), Ok(())) => {
                state.dbg(format!("snapshot written to {}", path.display()));
                state.last_error = None;
                effects.push(Effect::ShowToast {
                    text: format!("Saved snapshot to {}", path.display()),
                    level: ToastLevel::Success,
                    seconds: 3,
                });
            }
            (None, Ok(())) => {
                state.dbg("snapshot captured");
                effects.push(Effect::ShowToast {
                    text: "Snapshot captured".into(),
                    level: ToastLevel::Info,
                    seconds: 2,
                });
            }
            (_, Err(e)) => {
                state.dbg(format!("snapshot failed: {e}"));
                state.last_error = Some(e.clone());
                effects.push(Effect::ShowToast {
                    text: e,
                    level: ToastLevel::Error,
                    seconds: 5,
                });
            }
        },
    }
    effects
}
