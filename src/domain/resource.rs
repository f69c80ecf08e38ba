use crate::utils::error::AcrewityError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Acrewity 提供的服務類別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    UuidGenerator,
    BarcodeGenerator,
    QrCodeGenerator,
    RegexMatcher,
    TextDiff,
    UrlEncoderDecoder,
    TimezoneConverter,
    MarkdownTableGenerator,
    JsonSchemaValidator,
    UrlToMarkdown,
    HtmlToPdf,
    HtmlToMarkdown,
    MarkdownToHtml,
    ImageConverter,
    ExcelToJson,
    ExcelEditor,
    PdfMerge,
    PdfExtractPage,
    PdfToHtml,
    PdfToMarkdown,
    SitemapExtractor,
    EmailAccess,
}

impl Resource {
    pub const ALL: [Resource; 22] = [
        Resource::UuidGenerator,
        Resource::BarcodeGenerator,
        Resource::QrCodeGenerator,
        Resource::RegexMatcher,
        Resource::TextDiff,
        Resource::UrlEncoderDecoder,
        Resource::TimezoneConverter,
        Resource::MarkdownTableGenerator,
        Resource::JsonSchemaValidator,
        Resource::UrlToMarkdown,
        Resource::HtmlToPdf,
        Resource::HtmlToMarkdown,
        Resource::MarkdownToHtml,
        Resource::ImageConverter,
        Resource::ExcelToJson,
        Resource::ExcelEditor,
        Resource::PdfMerge,
        Resource::PdfExtractPage,
        Resource::PdfToHtml,
        Resource::PdfToMarkdown,
        Resource::SitemapExtractor,
        Resource::EmailAccess,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::UuidGenerator => "uuid_generator",
            Resource::BarcodeGenerator => "barcode_generator",
            Resource::QrCodeGenerator => "qr_code_generator",
            Resource::RegexMatcher => "regex_matcher",
            Resource::TextDiff => "text_diff",
            Resource::UrlEncoderDecoder => "url_encoder_decoder",
            Resource::TimezoneConverter => "timezone_converter",
            Resource::MarkdownTableGenerator => "markdown_table_generator",
            Resource::JsonSchemaValidator => "json_schema_validator",
            Resource::UrlToMarkdown => "url_to_markdown",
            Resource::HtmlToPdf => "html_to_pdf",
            Resource::HtmlToMarkdown => "html_to_markdown",
            Resource::MarkdownToHtml => "markdown_to_html",
            Resource::ImageConverter => "image_converter",
            Resource::ExcelToJson => "excel_to_json",
            Resource::ExcelEditor => "excel_editor",
            Resource::PdfMerge => "pdf_merge",
            Resource::PdfExtractPage => "pdf_extract_page",
            Resource::PdfToHtml => "pdf_to_html",
            Resource::PdfToMarkdown => "pdf_to_markdown",
            Resource::SitemapExtractor => "sitemap_extractor",
            Resource::EmailAccess => "email_access",
        }
    }

    /// 送出時的 `service` 名稱
    pub fn service_name(&self, naming: ServiceNaming) -> String {
        match naming {
            ServiceNaming::Hyphenated => self.as_str().replace('_', "-"),
            ServiceNaming::Underscored => self.as_str().to_string(),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = AcrewityError;

    /// 接受底線或連字號寫法 (`uuid_generator` / `uuid-generator`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_");
        Resource::ALL
            .iter()
            .copied()
            .find(|resource| resource.as_str() == normalized)
            .ok_or_else(|| AcrewityError::UnknownResource {
                resource: s.to_string(),
            })
    }
}

/// API 的 service 命名規則在版本間由底線改為連字號
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ServiceNaming {
    #[default]
    Hyphenated,
    Underscored,
}
