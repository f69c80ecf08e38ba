use crate::core::template;
use crate::domain::model::Item;
use crate::domain::ports::ParameterSource;
use crate::domain::resource::Resource;
use crate::domain::schema::{number_value, resource_spec, FieldKind, FieldSpec, JsonShape};
use crate::utils::error::{AcrewityError, Result};
use crate::utils::validation::validate_range;
use serde_json::{Map, Value};

/// 設定檔中的欄位值，依每個項目渲染 `{{ ... }}` 表達式
pub struct ItemParameters<'a> {
    values: &'a Map<String, Value>,
    items: &'a [Item],
}

impl<'a> ItemParameters<'a> {
    pub fn new(values: &'a Map<String, Value>, items: &'a [Item]) -> Self {
        Self { values, items }
    }
}

impl ParameterSource for ItemParameters<'_> {
    fn get(&self, name: &str, item_index: usize) -> Result<Option<Value>> {
        let Some(raw) = self.values.get(name) else {
            return Ok(None);
        };

        let rendered = match self.items.get(item_index) {
            Some(item) => template::render(raw, &item.json),
            None => raw.clone(),
        };

        // 表達式指向不存在的欄位時視為未設定
        Ok(match rendered {
            Value::Null => None,
            value => Some(value),
        })
    }
}

/// 未指定 operation 時使用該 resource 的預設值
pub fn resolve_operation(resource: Resource, operation: Option<&str>) -> Result<&'static str> {
    let spec = resource_spec(resource);
    match operation {
        None => Ok(spec.default_operation()),
        Some(value) => spec
            .operation(value)
            .map(|op| op.value)
            .ok_or_else(|| AcrewityError::UnsupportedOperation {
                resource: resource.as_str().to_string(),
                operation: value.to_string(),
            }),
    }
}

/// 依 resource/operation 宣告的欄位組出 `parameters` 物件
pub fn build_parameters(
    resource: Resource,
    operation: &str,
    source: &dyn ParameterSource,
    item_index: usize,
) -> Result<Map<String, Value>> {
    let operation = resolve_operation(resource, Some(operation))?;
    let spec = resource_spec(resource);
    let mut parameters = Map::new();

    for field in spec.fields_for(operation) {
        let value = match source.get(field.name, item_index)? {
            Some(value) => value,
            None => match field.default.to_value() {
                Some(default) => default,
                None if field.required => {
                    return Err(AcrewityError::MissingParameter {
                        field: field.name.to_string(),
                    })
                }
                None => continue,
            },
        };

        let value = coerce(field, value)?;
        parameters.insert(field.name.to_string(), value);
    }

    Ok(parameters)
}

fn coerce(field: &FieldSpec, value: Value) -> Result<Value> {
    match field.kind {
        // 空白字串是合法輸入 (例如編碼單一空格)，原樣送出
        FieldKind::String => coerce_string(field, value).map(Value::String),
        FieldKind::Number { min, max } => {
            let n = coerce_number(field, &value)?;
            validate_range(field.name, n, min, max).map_err(into_parameter_error)?;
            Ok(number_value(n))
        }
        FieldKind::Boolean => coerce_bool(field, &value).map(Value::Bool),
        FieldKind::Json(shape) => coerce_json(field, value, shape),
        FieldKind::Options(options) => coerce_option(field, value, options),
    }
}

fn coerce_string(field: &FieldSpec, value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        Value::Array(_) | Value::Object(_) => Err(AcrewityError::invalid_parameter(
            field.name,
            "expected text, got a JSON array or object",
        )),
    }
}

fn coerce_number(field: &FieldSpec, value: &Value) -> Result<f64> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| AcrewityError::invalid_parameter(field.name, "number out of range")),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()).ok_or_else(|| {
            AcrewityError::invalid_parameter(field.name, format!("'{}' is not a number", s))
        }),
        other => Err(AcrewityError::invalid_parameter(
            field.name,
            format!("expected a number, got {}", other),
        )),
    }
}

fn coerce_bool(field: &FieldSpec, value: &Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) if s.trim().eq_ignore_ascii_case("true") => Ok(true),
        Value::String(s) if s.trim().eq_ignore_ascii_case("false") => Ok(false),
        other => Err(AcrewityError::invalid_parameter(
            field.name,
            format!("expected a boolean, got {}", other),
        )),
    }
}

fn coerce_json(field: &FieldSpec, value: Value, shape: JsonShape) -> Result<Value> {
    let parsed = match value {
        Value::String(s) => serde_json::from_str::<Value>(&s)
            .map_err(|e| AcrewityError::invalid_parameter(field.name, format!("invalid JSON: {}", e)))?,
        other => other,
    };

    match (shape, &parsed) {
        (JsonShape::Any, _) | (JsonShape::Array, Value::Array(_)) | (JsonShape::Object, Value::Object(_)) => {
            Ok(parsed)
        }
        (JsonShape::Array, _) => Err(AcrewityError::invalid_parameter(field.name, "expected a JSON array")),
        (JsonShape::Object, _) => Err(AcrewityError::invalid_parameter(field.name, "expected a JSON object")),
    }
}

fn coerce_option(field: &FieldSpec, value: Value, options: &[&str]) -> Result<Value> {
    let text = match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        other => {
            return Err(AcrewityError::invalid_parameter(
                field.name,
                format!("expected one of {}, got {}", options.join(", "), other),
            ))
        }
    };

    // UUID 版本等選項可能以數字輸入 (4 -> "v4")
    let prefixed = format!("v{}", text);
    options
        .iter()
        .find(|option| **option == text || **option == prefixed)
        .map(|option| Value::String(option.to_string()))
        .ok_or_else(|| {
            AcrewityError::invalid_parameter(
                field.name,
                format!("'{}' is not one of {}", text, options.join(", ")),
            )
        })
}

fn into_parameter_error(err: AcrewityError) -> AcrewityError {
    match err {
        AcrewityError::InvalidConfigValueError { field, reason, .. } => {
            AcrewityError::InvalidParameter { field, reason }
        }
        other => other,
    }
}
