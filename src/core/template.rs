use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([^{}]+?)\s*\}\}").expect("placeholder pattern is valid"));

/// 以目前項目的 JSON 替換欄位值中的 `{{ path }}` / `{{ $json.path }}`
///
/// 整個字串只有一個佔位符時保留原本的 JSON 型別 (數字、陣列...)，
/// 夾在文字中的佔位符則以字串替換。
pub fn render(value: &Value, item: &Value) -> Value {
    match value {
        Value::String(s) => render_str(s, item),
        Value::Array(values) => Value::Array(values.iter().map(|v| render(v, item)).collect()),
        Value::Object(obj) => Value::Object(
            obj.iter()
                .map(|(key, v)| (key.clone(), render(v, item)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn render_str(s: &str, item: &Value) -> Value {
    if let Some(caps) = PLACEHOLDER.captures(s) {
        if caps.get(0).map(|m| m.as_str().len()) == Some(s.len()) {
            return lookup(item, &caps[1]).cloned().unwrap_or(Value::Null);
        }
    } else {
        return Value::String(s.to_string());
    }

    let rendered = PLACEHOLDER.replace_all(s, |caps: &Captures| match lookup(item, &caps[1]) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    });
    Value::String(rendered.into_owned())
}

/// 以點號路徑取值，數字段落可索引陣列 (`rows.0.name`)
pub fn lookup<'a>(item: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.trim();
    let path = match path.strip_prefix("$json") {
        Some(rest) => rest.strip_prefix('.').unwrap_or(rest),
        None => path,
    };

    if path.is_empty() {
        return Some(item);
    }

    path.split('.').try_fold(item, |current, segment| match current {
        Value::Object(obj) => obj.get(segment),
        Value::Array(values) => segment.parse::<usize>().ok().and_then(|i| values.get(i)),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_whole_placeholder_keeps_type() {
        let item = json!({"count": 3, "tags": ["a", "b"]});

        assert_eq!(render(&json!("{{ count }}"), &item), json!(3));
        assert_eq!(render(&json!("{{ $json.tags }}"), &item), json!(["a", "b"]));
    }

    #[test]
    fn test_embedded_placeholders_are_stringified() {
        let item = json!({"user": {"name": "Ada", "id": 7}});
        let value = json!("Hello {{ $json.user.name }} (#{{user.id}})");

        assert_eq!(render(&value, &item), json!("Hello Ada (#7)"));
    }

    #[test]
    fn test_missing_path_renders_empty() {
        let item = json!({});

        assert_eq!(render(&json!("{{ missing }}"), &item), Value::Null);
        assert_eq!(render(&json!("x{{ missing }}y"), &item), json!("xy"));
    }

    #[test]
    fn test_plain_values_pass_through() {
        let item = json!({"a": 1});

        assert_eq!(render(&json!("no placeholders"), &item), json!("no placeholders"));
        assert_eq!(render(&json!(42), &item), json!(42));
        assert_eq!(
            render(&json!({"nested": ["{{ a }}"]}), &item),
            json!({"nested": [1]})
        );
    }

    #[test]
    fn test_lookup_indexes_arrays() {
        let item = json!({"rows": [{"name": "first"}, {"name": "second"}]});

        assert_eq!(lookup(&item, "rows.1.name"), Some(&json!("second")));
        assert_eq!(lookup(&item, "rows.5.name"), None);
        assert_eq!(lookup(&item, "$json"), Some(&item));
    }
}
