//! Plain-text extraction from uploaded documents
//!
//! Supports `.txt`, `.pdf` and `.docx`. Everything happens in memory;
//! uploads are never written to disk.

use quick_xml::{events::Event, Reader as XmlReader};
use std::io::{Cursor, Read};
use std::path::Path;
use thiserror::Error;
use zip::ZipArchive;

/// Extraction errors
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file type. Please upload a PDF, DOCX or TXT file")]
    Unsupported(String),

    #[error("Uploaded file is empty")]
    Empty,

    #[error("Failed to extract PDF text: {0}")]
    Pdf(String),

    #[error("Failed to extract DOCX text: {0}")]
    Docx(String),
}

impl ExtractError {
    /// Whether the error is the client's fault rather than a processing failure
    pub fn is_client_error(&self) -> bool {
        matches!(self, ExtractError::Unsupported(_) | ExtractError::Empty)
    }
}

/// Supported upload formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Text,
}

impl DocumentKind {
    /// Detect the format from the file extension
    pub fn from_filename(filename: &str) -> Result<Self, ExtractError> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "pdf" => Ok(DocumentKind::Pdf),
            "docx" => Ok(DocumentKind::Docx),
            "txt" => Ok(DocumentKind::Text),
            other => Err(ExtractError::Unsupported(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Docx => "docx",
            DocumentKind::Text => "txt",
        }
    }
}

/// Extract plain text from an uploaded file
pub fn extract_text(filename: &str, bytes: &[u8]) -> Result<String, ExtractError> {
    let kind = DocumentKind::from_filename(filename)?;

    if bytes.is_empty() {
        return Err(ExtractError::Empty);
    }

    let text = match kind {
        DocumentKind::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ExtractError::Pdf(e.to_string()))?,
        DocumentKind::Docx => extract_docx_text(bytes)?,
        DocumentKind::Text => String::from_utf8_lossy(bytes).into_owned(),
    };

    Ok(text.trim().to_string())
}

fn extract_docx_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| ExtractError::Docx(e.to_string()))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractError::Docx(format!("missing word/document.xml: {}", e)))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractError::Docx(e.to_string()))?;

    let mut reader = XmlReader::from_str(&xml);
    let mut buf = Vec::new();
    let mut output = String::new();
    let mut in_text_node = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"w:p" => push_paragraph_break(&mut output),
                b"w:tab" => output.push('\t'),
                b"w:br" => output.push('\n'),
                b"w:t" => in_text_node = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"w:p" => push_paragraph_break(&mut output),
                b"w:tab" => output.push('\t'),
                b"w:br" => output.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) if in_text_node => {
                let value = e.unescape().map_err(|err| ExtractError::Docx(err.to_string()))?;
                output.push_str(&value);
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"w:t" => in_text_node = false,
            Ok(Event::Eof) => break,
            Err(err) => return Err(ExtractError::Docx(format!("invalid XML: {}", err))),
            _ => {}
        }
        buf.clear();
    }

    Ok(output.trim().to_string())
}

fn push_paragraph_break(output: &mut String) {
    if !output.is_empty() {
        output.push_str("\n\n");
    }
}
