use crate::error::{EditorError, Result};
use crate::model::{Model, Payload};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayloadFormat {
    Json,
    Yaml,
}

impl PayloadFormat {
    // YAML is a superset of JSON, so unknown extensions go through it
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => PayloadFormat::Json,
            _ => PayloadFormat::Yaml,
        }
    }
}

pub fn load_payload(path: &Path) -> Result<Payload> {
    let text = fs::read_to_string(path).map_err(|source| EditorError::ReadPayload {
        path: path.to_path_buf(),
        source,
    })?;
    let payload = parse_payload(&text, PayloadFormat::from_path(path)).map_err(|message| {
        EditorError::ParsePayload {
            path: path.to_path_buf(),
            message,
        }
    })?;
    validate_payload(&payload)?;
    info!(
        path = %path.display(),
        params = payload.params.len(),
        values = payload.model.values.len(),
        "payload loaded"
    );
    Ok(payload)
}

pub fn parse_payload(text: &str, format: PayloadFormat) -> std::result::Result<Payload, String> {
    match format {
        PayloadFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
        PayloadFormat::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
    }
}

/// Duplicate definition ids are fatal. Shape mismatches and orphan values are
/// only logged and carried through untouched.
pub fn validate_payload(payload: &Payload) -> Result<()> {
    let mut seen: HashSet<i64> = HashSet::new();
    for def in &payload.params {
        if !seen.insert(def.id) {
            return Err(EditorError::DuplicateParam(def.id));
        }
    }
    for pv in &payload.model.values {
        match payload.definition(pv.param_id) {
            Some(def) if !pv.value.matches(def.param_type) => {
                warn!(
                    param_id = pv.param_id,
                    expected = ?def.param_type,
                    "value shape does not match parameter type"
                );
            }
            Some(_) => {}
            None => debug!(param_id = pv.param_id, "value for unknown parameter id"),
        }
    }
    Ok(())
}

pub fn snapshot_json(model: &Model) -> Result<String> {
    Ok(serde_json::to_string_pretty(model)?)
}

pub fn write_snapshot(path: &Path, model: &Model) -> Result<()> {
    let text = snapshot_json(model)?;
    fs::write(path, text).map_err(|source| EditorError::WriteSnapshot {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "snapshot written");
    Ok(())
}
