use crate::model::{ParamType, ParamValue, ParameterValue};

/// Separator between list elements in the display string. No escaping: an
/// element containing a space cannot survive a join/split round trip.
pub const LIST_DELIMITER: &str = " ";

pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(LIST_DELIMITER).map(str::to_string).collect()
}

pub fn join_list(items: &[String]) -> String {
    items.join(LIST_DELIMITER)
}

/// Turn raw field text into the value shape its type demands.
pub fn coerce(raw: &str, param_type: ParamType) -> ParamValue {
    match param_type {
        ParamType::PlainText => ParamValue::Scalar(raw.to_string()),
        ParamType::TextList => ParamValue::List(split_list(raw)),
    }
}

/// Display string for a stored value. Lists are always joined, whatever the
/// declared type, so a mismatched value still shows its content.
pub fn display_value(value: &ParamValue) -> String {
    match value {
        ParamValue::Scalar(s) => s.clone(),
        ParamValue::List(items) => join_list(items),
    }
}

/// Live working copy of the parameter values for one editing lifetime.
/// Seeded once; only `apply` and an explicit `replace` mutate it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditSession {
    values: Vec<ParameterValue>,
}

impl EditSession {
    pub fn new(values: Vec<ParameterValue>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[ParameterValue] {
        &self.values
    }

    pub fn value_for(&self, param_id: i64) -> Option<&ParamValue> {
        self.values
            .iter()
            .find(|v| v.param_id == param_id)
            .map(|v| &v.value)
    }

    /// Coerce `raw` and store it for `param_id`. Returns false (and changes
    /// nothing) when no value record exists for that id.
    pub fn apply(&mut self, param_id: i64, raw: &str, param_type: ParamType) -> bool {
        let mut hit = false;
        for pv in self.values.iter_mut().filter(|v| v.param_id == param_id) {
            pv.value = coerce(raw, param_type);
            hit = true;
        }
        hit
    }

    pub fn replace(&mut self, values: Vec<ParameterValue>) {
        self.values = values;
    }
}
