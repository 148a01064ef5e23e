//! Row and value types returned by the graph store

use std::collections::BTreeMap;

use serde::Serialize;

/// Named query parameters
pub type Params = BTreeMap<String, serde_json::Value>;

/// A single field value in a query result row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    List(Vec<String>),
    Null,
}

impl Value {
    /// Convert a JSON value coming back from the store.
    ///
    /// Scalars become text, arrays become lists of text (null elements are
    /// dropped), objects are rendered as their JSON text.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().filter_map(scalar_text).collect())
            }
            other => scalar_text(other).map(Value::Text).unwrap_or(Value::Null),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<&str>> for Value {
    fn from(items: Vec<&str>) -> Self {
        Value::List(items.into_iter().map(String::from).collect())
    }
}

impl From<Option<&str>> for Value {
    fn from(value: Option<&str>) -> Self {
        value.map(Value::from).unwrap_or(Value::Null)
    }
}

fn scalar_text(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// One result row: field names in column order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Row {
    fields: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field append
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Text field, `None` when missing or null
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_text)
    }

    /// List field, empty when missing or null
    pub fn list(&self, name: &str) -> Vec<String> {
        self.get(name)
            .and_then(Value::as_list)
            .map(<[String]>::to_vec)
            .unwrap_or_default()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_from_json() {
        assert_eq!(Value::from_json(json!("PAC_001")), Value::from("PAC_001"));
        assert_eq!(Value::from_json(json!(38.5)), Value::from("38.5"));
        assert_eq!(Value::from_json(json!(null)), Value::Null);
        assert_eq!(
            Value::from_json(json!(["Fiebre", null, "Tos"])),
            Value::from(vec!["Fiebre", "Tos"])
        );
    }

    #[test]
    fn test_row_keeps_column_order() {
        let row = Row::new()
            .with("Paciente", "PAC_001")
            .with("Nombre", "Ana")
            .with("Apellido", "Gil");

        let columns: Vec<&str> = row.columns().collect();
        assert_eq!(columns, vec!["Paciente", "Nombre", "Apellido"]);
        assert_eq!(row.text("Nombre"), Some("Ana"));
        assert_eq!(row.len(), 3);
    }

    #[test]
    fn test_row_missing_and_null_fields() {
        let row = Row::new()
            .with("Enfermedad", Value::Null)
            .with("Detalles", vec!["RiesgoAlto"]);

        assert_eq!(row.text("Enfermedad"), None);
        assert_eq!(row.text("Inexistente"), None);
        assert_eq!(row.list("Detalles"), vec!["RiesgoAlto".to_string()]);
        assert!(row.list("Accion").is_empty());
        assert!(row.get("Enfermedad").unwrap().is_null());
    }
}
