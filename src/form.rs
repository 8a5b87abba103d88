//! Request-body encoding for POST and PUT calls.
//!
//! The platform expects `application/x-www-form-urlencoded`-style bodies
//! with every field nested under a single top-level `data` key
//! (`data[name]=Acme`, `data[price][gross]=10`, `data[tags][0]=new`).
//! Raw JSON or XML payloads are rejected, so the mapping handed to
//! `execute` is flattened here.

use serde_json::Value;
use url::form_urlencoded;

/// Serializes `data` into the nested form encoding the platform expects.
///
/// Objects and arrays recurse into bracketed keys; scalars are rendered
/// with their plain string representation. `null` values are omitted.
pub(crate) fn encode_data(data: &Value) -> String {
    let mut pairs = Vec::new();
    collect_pairs("data", data, &mut pairs);

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in &pairs {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

fn collect_pairs(prefix: &str, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(b) => pairs.push((prefix.to_string(), b.to_string())),
        Value::Number(n) => pairs.push((prefix.to_string(), n.to_string())),
        Value::String(s) => pairs.push((prefix.to_string(), s.clone())),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                collect_pairs(&format!("{prefix}[{index}]"), item, pairs);
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                collect_pairs(&format!("{prefix}[{key}]"), item, pairs);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_flat_mapping() {
        let body = encode_data(&json!({"name": "Acme"}));
        assert_eq!(body, "data%5Bname%5D=Acme");
    }

    #[test]
    fn test_encode_nested_mapping() {
        let body = encode_data(&json!({"price": {"gross": 10, "net": 8.4}}));
        assert_eq!(
            body,
            "data%5Bprice%5D%5Bgross%5D=10&data%5Bprice%5D%5Bnet%5D=8.4"
        );
    }

    #[test]
    fn test_encode_array_indices() {
        let body = encode_data(&json!({"tags": ["new", "featured"]}));
        assert_eq!(
            body,
            "data%5Btags%5D%5B0%5D=new&data%5Btags%5D%5B1%5D=featured"
        );
    }

    #[test]
    fn test_encode_scalars() {
        let body = encode_data(&json!({"active": true, "stock": 42}));
        assert_eq!(body, "data%5Bactive%5D=true&data%5Bstock%5D=42");
    }

    #[test]
    fn test_null_values_are_omitted() {
        let body = encode_data(&json!({"name": "Acme", "deleted_at": null}));
        assert_eq!(body, "data%5Bname%5D=Acme");
    }

    #[test]
    fn test_values_are_percent_encoded() {
        let body = encode_data(&json!({"name": "Acme & Co"}));
        assert_eq!(body, "data%5Bname%5D=Acme+%26+Co");
    }

    #[test]
    fn test_empty_mapping_encodes_to_empty_body() {
        assert_eq!(encode_data(&json!({})), "");
    }
}
