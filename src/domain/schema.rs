//! 節點的宣告式欄位定義：每個 resource 有哪些 operation、每個 operation 要送哪些欄位。

use crate::domain::resource::Resource;
use serde_json::{json, Map, Number, Value};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JsonShape {
    Any,
    Array,
    Object,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    String,
    Number { min: Option<f64>, max: Option<f64> },
    Boolean,
    /// 以 JSON 字串輸入，送出前解析成陣列/物件
    Json(JsonShape),
    Options(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldDefault {
    None,
    Str(&'static str),
    Number(f64),
    Bool(bool),
}

impl FieldDefault {
    pub fn to_value(&self) -> Option<Value> {
        match *self {
            FieldDefault::None => None,
            FieldDefault::Str(s) => Some(Value::String(s.to_string())),
            FieldDefault::Number(n) => Some(number_value(n)),
            FieldDefault::Bool(b) => Some(Value::Bool(b)),
        }
    }
}

/// 整數值以整數送出，其餘保留浮點數
pub fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::Number((n as i64).into())
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub display_name: &'static str,
    pub kind: FieldKind,
    pub default: FieldDefault,
    pub required: bool,
    /// 空陣列表示適用於該 resource 的所有 operation
    pub operations: &'static [&'static str],
    pub secret: bool,
    pub description: &'static str,
}

impl FieldSpec {
    const fn new(
        name: &'static str,
        display_name: &'static str,
        kind: FieldKind,
        default: FieldDefault,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            display_name,
            kind,
            default,
            required: false,
            operations: &[],
            secret: false,
            description,
        }
    }

    const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    const fn only_for(mut self, operations: &'static [&'static str]) -> Self {
        self.operations = operations;
        self
    }

    const fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    pub fn applies_to(&self, operation: &str) -> bool {
        self.operations.is_empty() || self.operations.contains(&operation)
    }

    fn type_name(&self) -> &'static str {
        match self.kind {
            FieldKind::String | FieldKind::Json(_) => "string",
            FieldKind::Number { .. } => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Options(_) => "options",
        }
    }

    fn describe(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("name".into(), json!(self.name));
        obj.insert("displayName".into(), json!(self.display_name));
        obj.insert("type".into(), json!(self.type_name()));
        obj.insert("required".into(), json!(self.required));
        obj.insert(
            "default".into(),
            self.default.to_value().unwrap_or(Value::Null),
        );
        obj.insert("description".into(), json!(self.description));

        match self.kind {
            FieldKind::Number { min, max } => {
                if let Some(min) = min {
                    obj.insert("minValue".into(), number_value(min));
                }
                if let Some(max) = max {
                    obj.insert("maxValue".into(), number_value(max));
                }
            }
            FieldKind::Options(options) => {
                obj.insert("options".into(), json!(options));
            }
            FieldKind::Json(shape) => {
                let shape = match shape {
                    JsonShape::Any => "any",
                    JsonShape::Array => "array",
                    JsonShape::Object => "object",
                };
                obj.insert("json".into(), json!(shape));
            }
            FieldKind::String | FieldKind::Boolean => {}
        }

        if !self.operations.is_empty() {
            obj.insert("operations".into(), json!(self.operations));
        }
        if self.secret {
            obj.insert("password".into(), json!(true));
        }

        Value::Object(obj)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OperationSpec {
    pub value: &'static str,
    pub name: &'static str,
    pub action: &'static str,
}

const fn op(value: &'static str, name: &'static str, action: &'static str) -> OperationSpec {
    OperationSpec {
        value,
        name,
        action,
    }
}

#[derive(Debug)]
pub struct ResourceSpec {
    pub resource: Resource,
    pub display_name: &'static str,
    pub description: &'static str,
    pub operations: &'static [OperationSpec],
    pub fields: &'static [FieldSpec],
}

impl ResourceSpec {
    pub fn operation(&self, value: &str) -> Option<&'static OperationSpec> {
        self.operations.iter().find(|op| op.value == value)
    }

    /// 第一個 operation 即為預設值
    pub fn default_operation(&self) -> &'static str {
        self.operations[0].value
    }

    pub fn fields_for<'a>(&'a self, operation: &'a str) -> impl Iterator<Item = &'static FieldSpec> + 'a {
        self.fields.iter().filter(move |field| field.applies_to(operation))
    }

    pub fn operation_values(&self) -> Vec<&'static str> {
        self.operations.iter().map(|op| op.value).collect()
    }
}

const fn string(name: &'static str, display_name: &'static str, description: &'static str) -> FieldSpec {
    FieldSpec::new(name, display_name, FieldKind::String, FieldDefault::None, description)
}

const fn string_default(
    name: &'static str,
    display_name: &'static str,
    default: &'static str,
    description: &'static str,
) -> FieldSpec {
    FieldSpec::new(name, display_name, FieldKind::String, FieldDefault::Str(default), description)
}

const fn number(
    name: &'static str,
    display_name: &'static str,
    default: f64,
    min: Option<f64>,
    max: Option<f64>,
    description: &'static str,
) -> FieldSpec {
    FieldSpec::new(
        name,
        display_name,
        FieldKind::Number { min, max },
        FieldDefault::Number(default),
        description,
    )
}

const fn boolean(
    name: &'static str,
    display_name: &'static str,
    default: bool,
    description: &'static str,
) -> FieldSpec {
    FieldSpec::new(name, display_name, FieldKind::Boolean, FieldDefault::Bool(default), description)
}

const fn options(
    name: &'static str,
    display_name: &'static str,
    values: &'static [&'static str],
    default: &'static str,
    description: &'static str,
) -> FieldSpec {
    FieldSpec::new(
        name,
        display_name,
        FieldKind::Options(values),
        FieldDefault::Str(default),
        description,
    )
}

const fn json_field(
    name: &'static str,
    display_name: &'static str,
    shape: JsonShape,
    default: &'static str,
    description: &'static str,
) -> FieldSpec {
    FieldSpec::new(name, display_name, FieldKind::Json(shape), FieldDefault::Str(default), description)
}

const TIMEZONES: &[&str] = &["AEST", "CET", "CST", "EST", "GMT", "JST", "MST", "PST", "UTC"];

static UUID_GENERATOR: ResourceSpec = ResourceSpec {
    resource: Resource::UuidGenerator,
    display_name: "UUID Generator",
    description: "Generate unique identifiers",
    operations: &[op("generate_uuid", "Generate UUID", "Generate unique identifiers")],
    fields: &[
        options("version", "UUID Version", &["v1", "v4"], "v4", "The UUID version to generate"),
        number("count", "Count", 1.0, Some(1.0), Some(100.0), "Number of UUIDs to generate"),
    ],
};

static BARCODE_GENERATOR: ResourceSpec = ResourceSpec {
    resource: Resource::BarcodeGenerator,
    display_name: "Barcode",
    description: "Generate barcodes",
    operations: &[op("generate_barcode", "Generate Barcode", "Generate a barcode")],
    fields: &[
        string("text", "Text", "The value to encode in the barcode").required(),
        options(
            "format",
            "Symbology",
            &["code128", "code39", "ean13", "ean8", "upc", "itf14"],
            "code128",
            "Barcode symbology",
        ),
        number("width", "Bar Width", 2.0, Some(1.0), Some(10.0), "Width of a single bar in pixels"),
        number("height", "Height", 100.0, Some(10.0), Some(500.0), "Height of the barcode in pixels"),
        boolean("includeText", "Include Text", true, "Whether to print the value under the bars"),
    ],
};

static QR_CODE_GENERATOR: ResourceSpec = ResourceSpec {
    resource: Resource::QrCodeGenerator,
    display_name: "QR Code",
    description: "Generate QR codes",
    operations: &[op("generate_qr", "Generate QR Code", "Generate a QR code")],
    fields: &[
        string("text", "Text/URL", "The text or URL to encode in the QR code").required(),
        options("format", "Format", &["png", "svg"], "png", "Image format of the QR code"),
        number("size", "Size", 300.0, Some(100.0), Some(1000.0), "Size of the QR code in pixels"),
    ],
};

static REGEX_MATCHER: ResourceSpec = ResourceSpec {
    resource: Resource::RegexMatcher,
    display_name: "Regex Matcher",
    description: "Match patterns in text",
    operations: &[op("match_pattern", "Match Pattern", "Match regex pattern in text")],
    fields: &[
        string("text", "Text", "The text to search in").required(),
        string("pattern", "Pattern", "The regex pattern to match").required(),
        string_default("flags", "Flags", "g", "Regex flags (g=global, i=case-insensitive, m=multiline)"),
    ],
};

static TEXT_DIFF: ResourceSpec = ResourceSpec {
    resource: Resource::TextDiff,
    display_name: "Text Diff",
    description: "Compare two texts",
    operations: &[op("compare_text", "Compare Text", "Compare two texts")],
    fields: &[
        string("text1", "Text 1", "The original text").required(),
        string("text2", "Text 2", "The text to compare against").required(),
        options("format", "Format", &["unified", "json"], "unified", "Output format for the diff"),
    ],
};

static URL_ENCODER_DECODER: ResourceSpec = ResourceSpec {
    resource: Resource::UrlEncoderDecoder,
    display_name: "URL Encoder/Decoder",
    description: "Encode or decode URLs",
    operations: &[
        op("encode", "Encode", "Url encode text"),
        op("decode", "Decode", "Url decode text"),
    ],
    fields: &[string("text", "Text", "The text to encode or decode").required()],
};

static TIMEZONE_CONVERTER: ResourceSpec = ResourceSpec {
    resource: Resource::TimezoneConverter,
    display_name: "Timezone Converter",
    description: "Convert between timezones",
    operations: &[op("convert_timezone", "Convert Timezone", "Convert time between timezones")],
    fields: &[
        string("datetime", "Date/Time", "The datetime to convert (e.g., 2025-10-23T12:00:00)").required(),
        options("fromTimezone", "From Timezone", TIMEZONES, "UTC", "Timezone of the input datetime"),
        options("toTimezone", "To Timezone", TIMEZONES, "EST", "Timezone to convert to"),
    ],
};

static MARKDOWN_TABLE_GENERATOR: ResourceSpec = ResourceSpec {
    resource: Resource::MarkdownTableGenerator,
    display_name: "Markdown Table",
    description: "Generate Markdown tables",
    operations: &[op("generate_table", "Generate Table", "Generate a markdown table")],
    fields: &[
        json_field(
            "headers",
            "Headers (JSON Array)",
            JsonShape::Array,
            r#"["Column1", "Column2", "Column3"]"#,
            "Table headers as a JSON array",
        )
        .required(),
        json_field(
            "rows",
            "Rows (JSON Array of Arrays)",
            JsonShape::Array,
            r#"[["Row1Col1", "Row1Col2", "Row1Col3"], ["Row2Col1", "Row2Col2", "Row2Col3"]]"#,
            "Table rows as a JSON array of arrays",
        )
        .required(),
    ],
};

static JSON_SCHEMA_VALIDATOR: ResourceSpec = ResourceSpec {
    resource: Resource::JsonSchemaValidator,
    display_name: "JSON Schema Validator",
    description: "Validate JSON against schemas",
    operations: &[op("validate_json", "Validate JSON", "Validate JSON against a schema")],
    fields: &[
        json_field("data", "Data (JSON)", JsonShape::Any, "{}", "The JSON data to validate").required(),
        json_field(
            "schema",
            "Schema (JSON)",
            JsonShape::Object,
            r#"{"type": "object", "properties": {}}"#,
            "The JSON Schema to validate against",
        )
        .required(),
    ],
};

static URL_TO_MARKDOWN: ResourceSpec = ResourceSpec {
    resource: Resource::UrlToMarkdown,
    display_name: "URL to Markdown",
    description: "Convert web pages to Markdown",
    operations: &[op("url_to_markdown", "Convert URL", "Convert web page to markdown")],
    fields: &[string("url", "URL", "The URL of the web page to convert").required()],
};

static HTML_TO_PDF: ResourceSpec = ResourceSpec {
    resource: Resource::HtmlToPdf,
    display_name: "HTML to PDF",
    description: "Convert HTML to PDF documents",
    operations: &[op("convert_pdf", "Convert to PDF", "Convert HTML to PDF")],
    fields: &[string_default(
        "html",
        "HTML Content",
        "<html><body><h1>Hello World</h1></body></html>",
        "The HTML content to convert to PDF",
    )
    .required()],
};

static HTML_TO_MARKDOWN: ResourceSpec = ResourceSpec {
    resource: Resource::HtmlToMarkdown,
    display_name: "HTML to Markdown",
    description: "Convert HTML to Markdown",
    operations: &[op("convert", "Convert to Markdown", "Convert html to markdown")],
    fields: &[
        string("content", "HTML Content", "The HTML content to convert").required(),
        boolean("preserve_tables", "Preserve Tables", true, "Whether to preserve table formatting"),
    ],
};

static MARKDOWN_TO_HTML: ResourceSpec = ResourceSpec {
    resource: Resource::MarkdownToHtml,
    display_name: "Markdown to HTML",
    description: "Convert Markdown to HTML",
    operations: &[
        op("convert", "Convert to HTML", "Convert markdown to html"),
        op("fragment", "Convert to Fragment", "Convert markdown to html fragment"),
    ],
    fields: &[
        string("content", "Markdown Content", "The Markdown content to convert").required(),
        boolean("include_styles", "Include Styles", true, "Whether to include CSS styles in the output")
            .only_for(&["convert"]),
        boolean("highlight_code", "Highlight Code", true, "Whether to add syntax highlighting to code blocks")
            .only_for(&["convert"]),
    ],
};

static IMAGE_CONVERTER: ResourceSpec = ResourceSpec {
    resource: Resource::ImageConverter,
    display_name: "Image Converter",
    description: "Convert images between formats",
    operations: &[op("convert_image", "Convert Image", "Convert image format")],
    fields: &[
        string("imageUrl", "Image URL", "URL of the image to convert").required(),
        options("format", "Output Format", &["jpeg", "png", "webp"], "jpeg", "Target image format"),
        number("quality", "Quality", 85.0, Some(1.0), Some(100.0), "Output quality (1-100)"),
    ],
};

static EXCEL_TO_JSON: ResourceSpec = ResourceSpec {
    resource: Resource::ExcelToJson,
    display_name: "Excel to JSON",
    description: "Convert Excel files to JSON",
    operations: &[op("convert", "Convert to JSON", "Convert excel to json")],
    fields: &[
        string("file", "Excel File (Base64)", "Base64 encoded Excel file content").required(),
        string_default("sheetName", "Sheet Name", "Sheet1", "Name of the sheet to convert"),
    ],
};

static EXCEL_EDITOR: ResourceSpec = ResourceSpec {
    resource: Resource::ExcelEditor,
    display_name: "JSON to Excel",
    description: "Convert JSON to Excel files",
    operations: &[op("create_excel", "Create Excel", "Create excel from json")],
    fields: &[
        json_field(
            "data",
            "Data (JSON Array)",
            JsonShape::Array,
            r#"[{"Name": "John", "Email": "john@example.com"}]"#,
            "JSON array of objects to convert to Excel",
        )
        .required(),
        string_default("sheetName", "Sheet Name", "Sheet1", "Name of the Excel sheet"),
    ],
};

static PDF_MERGE: ResourceSpec = ResourceSpec {
    resource: Resource::PdfMerge,
    display_name: "PDF Merge",
    description: "Merge multiple PDF files",
    operations: &[op("merge", "Merge PDFs", "Merge two PDF files")],
    fields: &[
        string("source_pdf", "Source PDF (Base64)", "First PDF file (Base64 encoded)").required(),
        string("target_pdf", "Target PDF (Base64)", "Second PDF file to append (Base64 encoded)").required(),
    ],
};

static PDF_EXTRACT_PAGE: ResourceSpec = ResourceSpec {
    resource: Resource::PdfExtractPage,
    display_name: "PDF Extract Page",
    description: "Extract pages from PDFs",
    operations: &[op("extract", "Extract Page", "Extract a page from PDF")],
    fields: &[
        string("pdf", "PDF File (Base64)", "PDF file (Base64 encoded)").required(),
        number("pageNumber", "Page Number", 1.0, Some(1.0), None, "Page number to extract (1-based)"),
    ],
};

static PDF_TO_HTML: ResourceSpec = ResourceSpec {
    resource: Resource::PdfToHtml,
    display_name: "PDF to HTML",
    description: "Convert PDF to HTML",
    operations: &[
        op("convert", "Convert to HTML", "Convert PDF to HTML"),
        op("metadata", "Get Metadata", "Get PDF metadata"),
    ],
    fields: &[
        string("base64_data", "PDF File (Base64)", "PDF file (Base64 encoded)").required(),
        boolean("include_styles", "Include Styles", true, "Whether to include CSS styles").only_for(&["convert"]),
    ],
};

static PDF_TO_MARKDOWN: ResourceSpec = ResourceSpec {
    resource: Resource::PdfToMarkdown,
    display_name: "PDF to Markdown",
    description: "Convert PDF to Markdown",
    operations: &[op("convert", "Convert to Markdown", "Convert pdf to markdown")],
    fields: &[string("base64_data", "PDF File (Base64)", "PDF file (Base64 encoded)").required()],
};

static SITEMAP_EXTRACTOR: ResourceSpec = ResourceSpec {
    resource: Resource::SitemapExtractor,
    display_name: "Sitemap Extractor",
    description: "Extract URLs from a website sitemap",
    operations: &[op("extract_sitemap", "Extract Sitemap", "Extract urls from a sitemap")],
    fields: &[
        string("url", "Sitemap URL", "URL of the sitemap.xml or of the site root").required(),
        number("limit", "Limit", 100.0, Some(1.0), Some(10000.0), "Maximum number of URLs to return"),
    ],
};

const SEND: &[&str] = &["send_email"];
const FETCH: &[&str] = &["fetch_emails"];

static EMAIL_ACCESS: ResourceSpec = ResourceSpec {
    resource: Resource::EmailAccess,
    display_name: "Email",
    description: "Send emails via SMTP or fetch them via IMAP/POP3",
    operations: &[
        op("send_email", "Send Email", "Send an email"),
        op("fetch_emails", "Fetch Emails", "Fetch emails from a mailbox"),
    ],
    fields: &[
        string("to", "To", "Recipient email address").required().only_for(SEND),
        string("subject", "Subject", "Email subject").required().only_for(SEND),
        string_default("text", "Body (Text)", "", "Plain text email body").only_for(SEND),
        string("smtp_host", "SMTP Host", "SMTP server hostname").required().only_for(SEND),
        number("smtp_port", "SMTP Port", 587.0, Some(1.0), Some(65535.0), "SMTP server port").only_for(SEND),
        string("smtp_user", "SMTP User", "SMTP username/email").required().only_for(SEND),
        string("smtp_pass", "SMTP Password", "SMTP password").required().secret().only_for(SEND),
        string("from", "From Email", "Sender email address").required().only_for(SEND),
        options("protocol", "Protocol", &["imap", "pop3"], "imap", "Mailbox access protocol").only_for(FETCH),
        string("host", "Mail Host", "IMAP/POP3 server hostname").required().only_for(FETCH),
        number("port", "Port", 993.0, Some(1.0), Some(65535.0), "IMAP/POP3 server port").only_for(FETCH),
        string("user", "User", "Mailbox username/email").required().only_for(FETCH),
        string("password", "Password", "Mailbox password").required().secret().only_for(FETCH),
        boolean("secure", "Use TLS", true, "Whether to connect over TLS").only_for(FETCH),
        string_default("mailbox", "Mailbox", "INBOX", "Mailbox to read (IMAP only)").only_for(FETCH),
        number("limit", "Limit", 10.0, Some(1.0), Some(100.0), "Maximum number of emails to fetch").only_for(FETCH),
    ],
};

pub fn resource_spec(resource: Resource) -> &'static ResourceSpec {
    match resource {
        Resource::UuidGenerator => &UUID_GENERATOR,
        Resource::BarcodeGenerator => &BARCODE_GENERATOR,
        Resource::QrCodeGenerator => &QR_CODE_GENERATOR,
        Resource::RegexMatcher => &REGEX_MATCHER,
        Resource::TextDiff => &TEXT_DIFF,
        Resource::UrlEncoderDecoder => &URL_ENCODER_DECODER,
        Resource::TimezoneConverter => &TIMEZONE_CONVERTER,
        Resource::MarkdownTableGenerator => &MARKDOWN_TABLE_GENERATOR,
        Resource::JsonSchemaValidator => &JSON_SCHEMA_VALIDATOR,
        Resource::UrlToMarkdown => &URL_TO_MARKDOWN,
        Resource::HtmlToPdf => &HTML_TO_PDF,
        Resource::HtmlToMarkdown => &HTML_TO_MARKDOWN,
        Resource::MarkdownToHtml => &MARKDOWN_TO_HTML,
        Resource::ImageConverter => &IMAGE_CONVERTER,
        Resource::ExcelToJson => &EXCEL_TO_JSON,
        Resource::ExcelEditor => &EXCEL_EDITOR,
        Resource::PdfMerge => &PDF_MERGE,
        Resource::PdfExtractPage => &PDF_EXTRACT_PAGE,
        Resource::PdfToHtml => &PDF_TO_HTML,
        Resource::PdfToMarkdown => &PDF_TO_MARKDOWN,
        Resource::SitemapExtractor => &SITEMAP_EXTRACTOR,
        Resource::EmailAccess => &EMAIL_ACCESS,
    }
}

/// 產生節點描述 JSON (resources → operations → fields)
pub fn describe() -> Value {
    let resources: Vec<Value> = Resource::ALL
        .iter()
        .map(|resource| {
            let spec = resource_spec(*resource);
            json!({
                "value": resource.as_str(),
                "name": spec.display_name,
                "description": spec.description,
                "defaultOperation": spec.default_operation(),
                "operations": spec
                    .operations
                    .iter()
                    .map(|op| json!({"value": op.value, "name": op.name, "action": op.action}))
                    .collect::<Vec<_>>(),
                "fields": spec.fields.iter().map(FieldSpec::describe).collect::<Vec<_>>(),
            })
        })
        .collect();

    json!({
        "name": "acrewity",
        "displayName": "Acrewity",
        "description": "Consume the Acrewity API - 20+ utility services for data conversion, PDF processing, QR codes, and more",
        "credentials": [{"name": "acrewityApi", "required": true}],
        "defaultResource": Resource::UuidGenerator.as_str(),
        "resources": resources,
    })
}
