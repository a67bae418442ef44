use serde_json::Value;

const COUNT: &str = "#";

/// Splits a path expression into segments.
///
/// Segments are separated by `.`; a backslash makes the next character
/// literal, so `"a\.b"` is the single key `a.b`.
pub(super) fn split_path(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            '.' => segments.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }

    segments.push(current);
    segments
}

/// Navigates through a JSON value following a path expression
///
/// # Arguments
/// * `value` - The root JSON value to navigate from
/// * `path` - Dot-separated path (e.g., "server.port" or "servers.0.host")
///
/// Numeric segments index arrays. On an array, `#` as the last segment yields
/// the array length, and `#` followed by more segments applies the rest of the
/// path to every element and collects the hits.
///
/// Returns `None` when the path is empty or leads nowhere.
pub(super) fn navigate_path(value: &Value, path: &str) -> Option<Value> {
    if path.is_empty() {
        return None;
    }

    navigate_segments(value, &split_path(path))
}

fn navigate_segments(value: &Value, segments: &[String]) -> Option<Value> {
    let Some((head, rest)) = segments.split_first() else {
        return Some(value.clone());
    };

    match value {
        Value::Object(map) => map.get(head).and_then(|v| navigate_segments(v, rest)),
        Value::Array(items) if head == COUNT => {
            if rest.is_empty() {
                return Some(Value::from(items.len()));
            }

            let hits = items
                .iter()
                .filter_map(|item| navigate_segments(item, rest))
                .collect();
            Some(Value::Array(hits))
        }
        Value::Array(items) => head
            .parse::<usize>()
            .ok()
            .and_then(|index| items.get(index))
            .and_then(|v| navigate_segments(v, rest)),
        _ => None,
    }
}

/// Deep merges `overlay` onto `base`.
///
/// Objects merge key by key with overlay entries winning; any other overlay
/// value replaces the base outright. A `null` object entry in the overlay
/// counts as absent and keeps the base entry.
pub(super) fn overlay_values(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut merged), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                if overlay_value.is_null() {
                    continue;
                }

                let merged_value = match merged.remove(&key) {
                    Some(base_value) => overlay_values(base_value, overlay_value),
                    None => overlay_value,
                };
                merged.insert(key, merged_value);
            }

            Value::Object(merged)
        }
        (_, overlay) => overlay,
    }
}

/// Compares two JSON values, treating numbers as equal when they denote the
/// same `f64` (so `1` and `1.0` match).
pub(super) fn same_value(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => l == r || l.as_f64() == r.as_f64(),
        (Value::Array(l), Value::Array(r)) => {
            l.len() == r.len() && l.iter().zip(r).all(|(l, r)| same_value(l, r))
        }
        (Value::Object(l), Value::Object(r)) => {
            l.len() == r.len()
                && l.iter().all(|(key, l)| r.get(key).is_some_and(|r| same_value(l, r)))
        }
        _ => left == right,
    }
}
