use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    #[serde(rename = "string")]
    PlainText,
    #[serde(rename = "list_string")]
    TextList,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ParameterDefinition {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ParamType,
}

// Untagged on the wire: "text" -> Scalar, ["a", "b"] -> List
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ParamValue {
    Scalar(String),
    List(Vec<String>),
}

impl ParamValue {
    pub fn matches(&self, param_type: ParamType) -> bool {
        matches!(
            (self, param_type),
            (ParamValue::Scalar(_), ParamType::PlainText) | (ParamValue::List(_), ParamType::TextList)
        )
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ParameterValue {
    #[serde(rename = "paramId")]
    pub param_id: i64,
    pub value: ParamValue,
}

impl ParameterValue {
    pub fn scalar(param_id: i64, value: impl Into<String>) -> Self {
        Self {
            param_id,
            value: ParamValue::Scalar(value.into()),
        }
    }

    pub fn list<S: Into<String>>(param_id: i64, items: impl IntoIterator<Item = S>) -> Self {
        Self {
            param_id,
            value: ParamValue::List(items.into_iter().map(Into::into).collect()),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TagColor {
    Red,
    Green,
    Blue,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ColorTag {
    #[serde(rename = "paramId")]
    pub param_id: i64,
    pub color: TagColor,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
pub struct Model {
    #[serde(rename = "paramValues", alias = "values")]
    pub values: Vec<ParameterValue>,
    #[serde(default)]
    pub colors: Vec<ColorTag>,
}

/// Construction-time input: the field schema plus the model it edits.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Payload {
    pub params: Vec<ParameterDefinition>,
    pub model: Model,
}

impl Payload {
    pub fn demo() -> Self {
        let def = |id, name: &str, param_type| ParameterDefinition {
            id,
            name: name.to_string(),
            param_type,
        };
        let tag = |param_id, color| ColorTag { param_id, color };
        Self {
            params: vec![
                def(1, "Purpose", ParamType::PlainText),
                def(2, "Length", ParamType::PlainText),
                def(3, "List", ParamType::TextList),
            ],
            model: Model {
                values: vec![
                    ParameterValue::scalar(1, "casual"),
                    ParameterValue::scalar(2, "maxi"),
                    ParameterValue::list(3, ["capt", "slept", "dept", "rang", "nept"]),
                ],
                colors: vec![
                    tag(1, TagColor::Blue),
                    tag(2, TagColor::Green),
                    tag(3, TagColor::Red),
                ],
            },
        }
    }

    pub fn definition(&self, id: i64) -> Option<&ParameterDefinition> {
        self.params.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_shape_follows_json_type() {
        let m: Model = serde_json::from_str(
            r#"{"paramValues":[{"paramId":1,"value":"casual"},{"paramId":3,"value":["a","b"]}]}"#,
        )
        .unwrap();
        assert_eq!(m.values[0], ParameterValue::scalar(1, "casual"));
        assert_eq!(m.values[1], ParameterValue::list(3, ["a", "b"]));
        assert!(m.colors.is_empty());
    }

    #[test]
    fn values_alias_and_wire_names() {
        let m: Model = serde_yaml::from_str(
            "values:\n  - { paramId: 2, value: maxi }\ncolors:\n  - { paramId: 2, color: green }\n",
        )
        .unwrap();
        assert_eq!(m.colors[0].color, TagColor::Green);
        let out = serde_json::to_value(&m).unwrap();
        assert!(out.get("paramValues").is_some());
        assert_eq!(out["colors"][0]["color"], "green");
        assert_eq!(out["paramValues"][0]["paramId"], 2);
    }

    #[test]
    fn param_type_wire_names() {
        let d: ParameterDefinition =
            serde_json::from_str(r#"{"id":3,"name":"List","type":"list_string"}"#).unwrap();
        assert_eq!(d.param_type, ParamType::TextList);
        assert!(ParamValue::List(vec![]).matches(ParamType::TextList));
        assert!(!ParamValue::Scalar(String::new()).matches(ParamType::TextList));
    }

    #[test]
    fn demo_payload_has_a_value_per_definition() {
        let p = Payload::demo();
        for def in &p.params {
            let v = p.model.values.iter().find(|v| v.param_id == def.id).unwrap();
            assert!(v.value.matches(def.param_type));
        }
        assert_eq!(p.definition(3).map(|d| d.name.as_str()), Some("List"));
    }
}
