// ── State normalizer ──
//
// Controllers and their plugins report state in every imaginable shape:
// bare scalars, `"on"`/`"off"` strings, nested `{value}` / `{state}`
// wrappers, or objects keyed by command id. This folds all of them into a
// tri-state: `Some(true)`, `Some(false)`, or `None` when no binary reading
// can be derived. `None` must never be collapsed into `false`.

use serde_json::Value;

/// Deepest object nesting that is still unwrapped.
pub const MAX_DEPTH: usize = 4;

const ON_WORDS: &[&str] = &["1", "on", "true", "open", "active"];
const OFF_WORDS: &[&str] = &["0", "off", "false", "closed", "inactive"];

/// Wrapper keys tried, in order, before scanning every property.
const WRAPPER_KEYS: &[&str] = &["value", "state", "result", "cmd"];

/// Normalize a raw state payload.
pub fn normalize(raw: &Value) -> Option<bool> {
    normalize_at(raw, 0)
}

fn normalize_at(raw: &Value, depth: usize) -> Option<bool> {
    match raw {
        Value::Null => None,
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|v| v > 0.0),
        Value::String(s) => normalize_str(s),
        Value::Array(items) => {
            if depth > MAX_DEPTH {
                return None;
            }
            items.iter().find_map(|v| normalize_at(v, depth + 1))
        }
        Value::Object(map) => {
            if depth > MAX_DEPTH {
                return None;
            }
            // The first wrapper key present decides, even if it yields nothing.
            if let Some(inner) = WRAPPER_KEYS.iter().find_map(|k| map.get(*k)) {
                return normalize_at(inner, depth + 1);
            }
            map.values().find_map(|v| normalize_at(v, depth + 1))
        }
    }
}

fn normalize_str(s: &str) -> Option<bool> {
    let word = s.trim().to_lowercase();
    if ON_WORDS.contains(&word.as_str()) {
        return Some(true);
    }
    if OFF_WORDS.contains(&word.as_str()) {
        return Some(false);
    }
    // A blank reading stays unknown instead of counting as off.
    word.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars() {
        assert_eq!(normalize(&json!(true)), Some(true));
        assert_eq!(normalize(&json!(false)), Some(false));
        assert_eq!(normalize(&json!(0)), Some(false));
        assert_eq!(normalize(&json!(42)), Some(true));
        assert_eq!(normalize(&json!(-1)), Some(false));
        assert_eq!(normalize(&Value::Null), None);
    }

    #[test]
    fn strings() {
        assert_eq!(normalize(&json!("ON")), Some(true));
        assert_eq!(normalize(&json!("0")), Some(false));
        assert_eq!(normalize(&json!(" Closed ")), Some(false));
        assert_eq!(normalize(&json!("Active")), Some(true));
        assert_eq!(normalize(&json!("37.5")), Some(true));
        assert_eq!(normalize(&json!("unknown")), None);
        assert_eq!(normalize(&json!("")), None);
    }

    #[test]
    fn nested_wrappers() {
        assert_eq!(normalize(&json!({ "state": { "value": 1 } })), Some(true));
        assert_eq!(normalize(&json!({ "result": "off" })), Some(false));
        assert_eq!(normalize(&json!({ "cmd": { "state": "on" } })), Some(true));
    }

    #[test]
    fn wrapper_key_decides_even_when_unresolved() {
        assert_eq!(normalize(&json!({ "value": "n/a", "other": 1 })), None);
    }

    #[test]
    fn dynamic_keys_are_scanned() {
        assert_eq!(normalize(&json!({ "224": "1" })), Some(true));
        assert_eq!(normalize(&json!({ "0": { "value": 0 } })), Some(false));
        assert_eq!(normalize(&json!({ "a": "?", "b": "on" })), Some(true));
    }

    #[test]
    fn empty_object_is_unknown() {
        assert_eq!(normalize(&json!({})), None);
    }

    #[test]
    fn depth_is_bounded() {
        let shallow = json!({ "value": { "value": { "value": { "value": 1 } } } });
        assert_eq!(normalize(&shallow), Some(true));

        let deep = json!({ "value": { "value": { "value": { "value": { "value": { "value": 1 } } } } } });
        assert_eq!(normalize(&deep), None);
    }
}
