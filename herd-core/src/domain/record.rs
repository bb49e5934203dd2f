//! Record domain type

use serde_json::{Map, Value};

/// One domain entity as returned by the source API
///
/// Records are open-ended: besides `id`, `name` and `type` they may carry any
/// number of extra fields, which are passed through untouched.
pub type Record = Map<String, Value>;

/// Returns the integer `id` of a record, if present
pub fn record_id(record: &Record) -> Option<i64> {
    record.get("id").and_then(Value::as_i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_id() {
        let record = json!({"id": 7, "name": "Fluffy"});
        assert_eq!(record_id(record.as_object().unwrap()), Some(7));
    }

    #[test]
    fn test_record_id_missing_or_not_integer() {
        let missing = json!({"name": "Fluffy"});
        assert_eq!(record_id(missing.as_object().unwrap()), None);

        let text = json!({"id": "7"});
        assert_eq!(record_id(text.as_object().unwrap()), None);
    }
}
