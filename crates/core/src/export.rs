//! Export engine: serialises a filtered suggestion set into a downloadable
//! report.
//!
//! Both formats carry the same column set. The internal `reply` column is
//! only emitted when [`ExportOptions::include_reply`] is set.

use std::io::{Cursor, Write};

use serde::Deserialize;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::CoreError;
use crate::permissions::{require, Actor, Capability};
use crate::suggestion::Suggestion;

/// Base name of every export file.
pub const EXPORT_FILE_STEM: &str = "suggestions_export";

const BASE_HEADERS: &[&str] = &[
    "Category",
    "Subcategory",
    "Suggestion",
    "Status",
    "Priority",
    "Assigned To",
    "Created At",
];
const REPLY_HEADER: &str = "Reply";

// ---------------------------------------------------------------------------
// Format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma-delimited text.
    Csv,
    /// OOXML spreadsheet (`.xlsx`).
    #[serde(alias = "xlsx")]
    Excel,
}

impl ExportFormat {
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "excel" | "xlsx" => Ok(Self::Excel),
            other => Err(CoreError::Validation(format!(
                "Unknown export format '{other}'. Valid formats: csv, excel"
            ))),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Excel => "xlsx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv; charset=utf-8",
            Self::Excel => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }

    pub fn filename(&self) -> String {
        format!("{EXPORT_FILE_STEM}.{}", self.extension())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Emit the admin-internal reply column.
    pub include_reply: bool,
}

/// A rendered export ready to be sent as an attachment.
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub format: ExportFormat,
    pub rows: usize,
    pub bytes: Vec<u8>,
}

impl ExportFile {
    pub fn filename(&self) -> String {
        self.format.filename()
    }

    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Render `suggestions` in `format`. Requires [`Capability::ExportData`].
///
/// The caller supplies the already-filtered, unpaginated result set.
pub fn export(
    actor: &Actor,
    suggestions: &[Suggestion],
    format: ExportFormat,
    options: ExportOptions,
) -> Result<ExportFile, CoreError> {
    require(actor, Capability::ExportData)?;
    let table = build_rows(suggestions, options);
    let bytes = match format {
        ExportFormat::Csv => write_csv(&table)?,
        ExportFormat::Excel => write_xlsx(&table)?,
    };
    Ok(ExportFile {
        format,
        rows: suggestions.len(),
        bytes,
    })
}

/// Header row followed by one row per suggestion.
fn build_rows(suggestions: &[Suggestion], options: ExportOptions) -> Vec<Vec<String>> {
    let mut header: Vec<String> = BASE_HEADERS.iter().map(|h| (*h).to_string()).collect();
    if options.include_reply {
        header.push(REPLY_HEADER.to_string());
    }

    let mut rows = Vec::with_capacity(suggestions.len() + 1);
    rows.push(header);
    for s in suggestions {
        let mut row = vec![
            s.category.clone(),
            s.subcategory.clone(),
            s.suggestion_text.clone(),
            s.status.as_str().to_string(),
            s.priority.as_str().to_string(),
            s.assigned_to.clone().unwrap_or_default(),
            s.created_at.to_rfc3339(),
        ];
        if options.include_reply {
            row.push(s.reply.clone().unwrap_or_default());
        }
        rows.push(row);
    }
    rows
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

fn write_csv(rows: &[Vec<String>]) -> Result<Vec<u8>, CoreError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer
            .write_record(row)
            .map_err(|e| CoreError::Internal(format!("CSV write failed: {e}")))?;
    }
    writer
        .into_inner()
        .map_err(|e| CoreError::Internal(format!("CSV flush failed: {e}")))
}

// ---------------------------------------------------------------------------
// XLSX
// ---------------------------------------------------------------------------

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Suggestions" sheetId="1" r:id="rId1"/></sheets></workbook>"#;

const WORKBOOK_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

/// Path of the single worksheet inside the workbook archive.
pub const XLSX_SHEET_PATH: &str = "xl/worksheets/sheet1.xml";

fn write_xlsx(rows: &[Vec<String>]) -> Result<Vec<u8>, CoreError> {
    let parts: [(&str, std::borrow::Cow<'_, str>); 5] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML.into()),
        ("_rels/.rels", ROOT_RELS_XML.into()),
        ("xl/workbook.xml", WORKBOOK_XML.into()),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS_XML.into()),
        (XLSX_SHEET_PATH, sheet_xml(rows).into()),
    ];

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in parts {
        zip.start_file(name, options)
            .map_err(|e| CoreError::Internal(format!("XLSX write failed: {e}")))?;
        zip.write_all(body.as_bytes())
            .map_err(|e| CoreError::Internal(format!("XLSX write failed: {e}")))?;
    }
    let cursor = zip
        .finish()
        .map_err(|e| CoreError::Internal(format!("XLSX finalise failed: {e}")))?;
    Ok(cursor.into_inner())
}

fn sheet_xml(rows: &[Vec<String>]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (r, row) in rows.iter().enumerate() {
        let row_num = r + 1;
        xml.push_str(&format!(r#"<row r="{row_num}">"#));
        for (c, value) in row.iter().enumerate() {
            xml.push_str(&format!(
                r#"<c r="{}{row_num}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                column_letters(c),
                escape_xml(value)
            ));
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

/// Zero-based column index to spreadsheet letters (`0 -> A`, `26 -> AA`).
fn column_letters(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Escape text for XML character data, dropping characters XML 1.0 forbids.
fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(ch),
            c if (c as u32) < 0x20 => {}
            c => out.push(c),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
