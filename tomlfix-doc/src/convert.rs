use toml_edit::{Array, InlineTable, Value};

/// Convert a JSON fix payload into a TOML value.
///
/// `null` has no TOML counterpart; neither does an array or object containing one.
pub fn json_to_value(json: &serde_json::Value) -> Option<Value> {
    match json {
        serde_json::Value::Null => None,
        serde_json::Value::Bool(b) => Some(Value::from(*b)),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Some(Value::from(i)),
            None => n.as_f64().map(Value::from),
        },
        serde_json::Value::String(s) => Some(Value::from(s.as_str())),
        serde_json::Value::Array(items) => {
            let mut arr = Array::new();
            for item in items {
                arr.push(json_to_value(item)?);
            }
            Some(Value::Array(arr))
        }
        serde_json::Value::Object(map) => {
            let mut table = InlineTable::new();
            for (k, v) in map {
                table.insert(k.as_str(), json_to_value(v)?);
            }
            table.fmt();
            Some(Value::InlineTable(table))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_convert() {
        assert_eq!(json_to_value(&serde_json::json!(true)).unwrap().as_bool(), Some(true));
        assert_eq!(json_to_value(&serde_json::json!(7)).unwrap().as_integer(), Some(7));
        assert_eq!(json_to_value(&serde_json::json!("2")).unwrap().as_str(), Some("2"));
        assert!(json_to_value(&serde_json::Value::Null).is_none());
    }

    #[test]
    fn nested_null_is_rejected() {
        assert!(json_to_value(&serde_json::json!([1, null])).is_none());
        assert!(json_to_value(&serde_json::json!({ "a": null })).is_none());
    }

    #[test]
    fn object_becomes_inline_table() {
        let v = json_to_value(&serde_json::json!({ "workspace": true })).unwrap();
        let table = v.as_inline_table().expect("inline table");
        assert_eq!(table.get("workspace").and_then(|v| v.as_bool()), Some(true));
    }
}
