//! Stripe's form encoding: nested objects travel as bracketed keys,
//! e.g. `billing_details[address][city]=Portland`.

use serde::Serialize;
use serde_json::{Map, Value};

pub fn encode<T: Serialize>(params: &T) -> Result<Vec<(String, String)>, serde_json::Error> {
    let mut pairs = Vec::new();
    flatten(String::new(), serde_json::to_value(params)?, &mut pairs);
    Ok(pairs)
}

fn flatten(prefix: String, value: Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(flag) => pairs.push((prefix, flag.to_string())),
        Value::Number(number) => pairs.push((prefix, number.to_string())),
        Value::String(text) => pairs.push((prefix, text)),
        Value::Array(items) => {
            for (index, item) in items.into_iter().enumerate() {
                flatten(child_key(&prefix, &index.to_string()), item, pairs);
            }
        }
        Value::Object(fields) => {
            for (key, item) in fields {
                flatten(child_key(&prefix, &key), item, pairs);
            }
        }
    }
}

fn child_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}[{}]", prefix, key)
    }
}

/// Rebuilds the nested JSON object from a form body. Every leaf is a string.
pub fn decode(body: &[u8]) -> Value {
    let mut root = Map::new();
    for (key, value) in url::form_urlencoded::parse(body) {
        insert(&mut root, &key_path(&key), value.into_owned());
    }
    Value::Object(root)
}

fn key_path(key: &str) -> Vec<String> {
    let (head, mut rest) = match key.find('[') {
        Some(index) => (&key[..index], &key[index..]),
        None => (key, ""),
    };

    let mut path = vec![head.to_string()];
    while let Some(stripped) = rest.strip_prefix('[') {
        match stripped.find(']') {
            Some(end) => {
                path.push(stripped[..end].to_string());
                rest = &stripped[end + 1..];
            }
            None => break,
        }
    }
    path
}

fn insert(map: &mut Map<String, Value>, path: &[String], value: String) {
    let Some((first, rest)) = path.split_first() else {
        return;
    };

    if rest.is_empty() {
        map.insert(first.clone(), Value::String(value));
        return;
    }

    // `expand[]=a&expand[]=b`
    if rest.len() == 1 && rest[0].is_empty() {
        let entry = map
            .entry(first.clone())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(items) = entry {
            items.push(Value::String(value));
        }
        return;
    }

    let entry = map
        .entry(first.clone())
        .or_insert_with(|| Value::Object(Map::new()));
    if !entry.is_object() {
        *entry = Value::Object(Map::new());
    }
    if let Value::Object(inner) = entry {
        insert(inner, rest, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_nested_keys() {
        let pairs = encode(&json!({
            "type": "card",
            "billing_details": { "address": { "city": "North New Portland" }, "email": null },
            "card": { "exp_month": 9 }
        }))
        .unwrap();

        assert!(pairs.contains(&("type".to_string(), "card".to_string())));
        assert!(pairs.contains(&(
            "billing_details[address][city]".to_string(),
            "North New Portland".to_string()
        )));
        assert!(pairs.contains(&("card[exp_month]".to_string(), "9".to_string())));
        assert!(!pairs.iter().any(|(key, _)| key.contains("email")));
    }

    #[test]
    fn test_decode_rebuilds_objects() {
        let body = "type=card&billing_details%5Baddress%5D%5Bline1%5D=2631+Bloomfield+Way&metadata[order_id]=123456789&expand[]=customer";
        let value = decode(body.as_bytes());

        assert_eq!(value["type"], "card");
        assert_eq!(
            value["billing_details"]["address"]["line1"],
            "2631 Bloomfield Way"
        );
        assert_eq!(value["metadata"]["order_id"], "123456789");
        assert_eq!(value["expand"], json!(["customer"]));
    }

    #[test]
    fn test_encoded_pairs_decode_to_same_shape() {
        let pairs = encode(&json!({ "card": { "exp_month": 12, "exp_year": 2031 } })).unwrap();
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish();

        assert_eq!(
            decode(body.as_bytes()),
            json!({ "card": { "exp_month": "12", "exp_year": "2031" } })
        );
    }
}
