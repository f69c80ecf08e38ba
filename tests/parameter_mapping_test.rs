use acrewity_node::core::parameters::{build_parameters, ItemParameters};
use acrewity_node::core::Item;
use acrewity_node::domain::schema::{resource_spec, FieldKind, FieldSpec, JsonShape};
use acrewity_node::{AcrewityError, Resource};
use serde_json::{json, Map, Value};
use std::collections::BTreeSet;

/// 依欄位型別給一個合法的範例值
fn sample_value(field: &FieldSpec) -> Value {
    match field.kind {
        FieldKind::String => json!(format!("sample-{}", field.name)),
        FieldKind::Number { min, .. } => json!(min.unwrap_or(1.0) as i64),
        FieldKind::Boolean => json!(false),
        FieldKind::Json(JsonShape::Array) => json!("[\"a\", \"b\"]"),
        FieldKind::Json(JsonShape::Object) => json!("{\"type\": \"object\"}"),
        FieldKind::Json(JsonShape::Any) => json!("{\"a\": 1}"),
        FieldKind::Options(options) => json!(options[options.len() - 1]),
    }
}

fn assert_kind(resource: Resource, field: &FieldSpec, value: &Value) {
    let ok = match field.kind {
        FieldKind::String | FieldKind::Options(_) => value.is_string(),
        FieldKind::Number { .. } => value.is_number(),
        FieldKind::Boolean => value.is_boolean(),
        FieldKind::Json(JsonShape::Array) => value.is_array(),
        FieldKind::Json(JsonShape::Object) | FieldKind::Json(JsonShape::Any) => value.is_object(),
    };
    assert!(ok, "{}.{} has wrong type: {}", resource, field.name, value);
}

#[test]
fn test_every_operation_sends_exactly_its_declared_fields() {
    let items = vec![Item::new(json!({}))];

    for resource in Resource::ALL {
        let spec = resource_spec(resource);

        for operation in spec.operation_values() {
            let declared: Vec<&FieldSpec> = spec.fields_for(operation).collect();
            let configured: Map<String, Value> = declared
                .iter()
                .map(|field| (field.name.to_string(), sample_value(field)))
                .collect();

            let source = ItemParameters::new(&configured, &items);
            let parameters = build_parameters(resource, operation, &source, 0)
                .unwrap_or_else(|e| panic!("{}.{} failed: {}", resource, operation, e));

            let expected: BTreeSet<&str> = declared.iter().map(|f| f.name).collect();
            let actual: BTreeSet<&str> = parameters.keys().map(String::as_str).collect();
            assert_eq!(actual, expected, "{}.{}", resource, operation);

            for field in declared {
                assert_kind(resource, field, &parameters[field.name]);
            }
        }
    }
}

#[test]
fn test_every_operation_builds_from_defaults_plus_required_fields() {
    let items = vec![Item::new(json!({}))];

    for resource in Resource::ALL {
        let spec = resource_spec(resource);

        for operation in spec.operation_values() {
            // 只設定沒有預設值的必填欄位
            let configured: Map<String, Value> = spec
                .fields_for(operation)
                .filter(|field| field.required && field.default.to_value().is_none())
                .map(|field| (field.name.to_string(), sample_value(field)))
                .collect();

            let source = ItemParameters::new(&configured, &items);
            let parameters = build_parameters(resource, operation, &source, 0)
                .unwrap_or_else(|e| panic!("{}.{} failed: {}", resource, operation, e));

            assert_eq!(parameters.len(), spec.fields_for(operation).count(), "{}.{}", resource, operation);
        }
    }
}

fn build(resource: Resource, operation: &str, configured: Value) -> Result<Value, AcrewityError> {
    let configured = configured.as_object().cloned().unwrap_or_default();
    let items = vec![Item::new(json!({}))];
    let source = ItemParameters::new(&configured, &items);
    build_parameters(resource, operation, &source, 0).map(Value::Object)
}

#[test]
fn test_markdown_to_html_style_flags_only_for_convert() {
    let configured = json!({"content": "# Hi", "include_styles": false, "highlight_code": "true"});

    assert_eq!(
        build(Resource::MarkdownToHtml, "convert", configured.clone()).unwrap(),
        json!({"content": "# Hi", "include_styles": false, "highlight_code": true})
    );
    assert_eq!(
        build(Resource::MarkdownToHtml, "fragment", configured).unwrap(),
        json!({"content": "# Hi"})
    );
}

#[test]
fn test_pdf_to_html_metadata_sends_only_document() {
    assert_eq!(
        build(Resource::PdfToHtml, "metadata", json!({"base64_data": "JVBERi0x"})).unwrap(),
        json!({"base64_data": "JVBERi0x"})
    );
    assert_eq!(
        build(Resource::PdfToHtml, "convert", json!({"base64_data": "JVBERi0x"})).unwrap(),
        json!({"base64_data": "JVBERi0x", "include_styles": true})
    );
}

#[test]
fn test_timezone_conversion_payload() {
    assert_eq!(
        build(
            Resource::TimezoneConverter,
            "convert_timezone",
            json!({"datetime": "2025-10-23T12:00:00", "toTimezone": "JST"})
        )
        .unwrap(),
        json!({"datetime": "2025-10-23T12:00:00", "fromTimezone": "UTC", "toTimezone": "JST"})
    );

    let err = build(
        Resource::TimezoneConverter,
        "convert_timezone",
        json!({"datetime": "2025-10-23T12:00:00", "toTimezone": "Mars/Olympus"}),
    )
    .unwrap_err();
    assert!(matches!(err, AcrewityError::InvalidParameter { ref field, .. } if field == "toTimezone"));
}

#[test]
fn test_excel_editor_parses_data_array() {
    assert_eq!(
        build(
            Resource::ExcelEditor,
            "create_excel",
            json!({"data": "[{\"Name\": \"Ada\"}]"})
        )
        .unwrap(),
        json!({"data": [{"Name": "Ada"}], "sheetName": "Sheet1"})
    );
}

#[test]
fn test_email_fetch_payload() {
    assert_eq!(
        build(
            Resource::EmailAccess,
            "fetch_emails",
            json!({"host": "imap.example.com", "user": "me", "password": "secret", "protocol": "pop3", "port": 995})
        )
        .unwrap(),
        json!({
            "protocol": "pop3",
            "host": "imap.example.com",
            "port": 995,
            "user": "me",
            "password": "secret",
            "secure": true,
            "mailbox": "INBOX",
            "limit": 10
        })
    );
}

#[test]
fn test_json_fields_accept_native_toml_values() {
    // 設定檔中直接寫陣列時不需再解析
    assert_eq!(
        build(
            Resource::MarkdownTableGenerator,
            "generate_table",
            json!({"headers": ["A"], "rows": [["1"]]})
        )
        .unwrap(),
        json!({"headers": ["A"], "rows": [["1"]]})
    );
}
