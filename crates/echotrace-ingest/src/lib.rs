//! Document ingestion for overlap checking.
//!
//! Turns a document file (`.pdf`, `.docx`, `.txt`) into plain UTF-8 text.
//! Any failure here is fatal to the analysis run: the caller surfaces the
//! error and no detectors are invoked.

use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Maximum decompressed bytes read from a single DOCX archive entry.
/// Guards against zip bombs.
const MAX_XML_ENTRY_BYTES: u64 = 50 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("unsupported document type: {0} (expected .pdf, .docx, or .txt)")]
    UnsupportedExtension(String),
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("file is not valid UTF-8: {0}")]
    NotUtf8(PathBuf),
    #[error("PDF extraction failed: {0}")]
    Pdf(String),
    #[error("DOCX extraction failed: {0}")]
    Docx(String),
}

/// Document format, inferred from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Text,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Result<Self, IngestError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => Ok(DocumentKind::Pdf),
            "docx" => Ok(DocumentKind::Docx),
            "txt" => Ok(DocumentKind::Text),
            _ => Err(IngestError::UnsupportedExtension(
                path.display().to_string(),
            )),
        }
    }
}

/// Read a document from disk and extract its text.
pub fn read_document(path: &Path) -> Result<String, IngestError> {
    let kind = DocumentKind::from_path(path)?;
    let bytes = std::fs::read(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), ?kind, bytes = bytes.len(), "read document");
    match kind {
        DocumentKind::Text => {
            String::from_utf8(bytes).map_err(|_| IngestError::NotUtf8(path.to_path_buf()))
        }
        _ => extract_text(&bytes, kind),
    }
}

/// Extract plain text from in-memory document bytes.
pub fn extract_text(bytes: &[u8], kind: DocumentKind) -> Result<String, IngestError> {
    match kind {
        DocumentKind::Pdf => {
            pdf_extract::extract_text_from_mem(bytes).map_err(|e| IngestError::Pdf(e.to_string()))
        }
        DocumentKind::Docx => extract_docx(bytes),
        DocumentKind::Text => String::from_utf8(bytes.to_vec())
            .map_err(|_| IngestError::NotUtf8(PathBuf::from("<memory>"))),
    }
}

/// Pull the text runs out of `word/document.xml`, one line per paragraph.
fn extract_docx(bytes: &[u8]) -> Result<String, IngestError> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes))
        .map_err(|e| IngestError::Docx(e.to_string()))?;

    let mut doc_xml = Vec::new();
    {
        let entry = archive
            .by_name("word/document.xml")
            .map_err(|_| IngestError::Docx("word/document.xml not found".to_string()))?;
        entry
            .take(MAX_XML_ENTRY_BYTES)
            .read_to_end(&mut doc_xml)
            .map_err(|e| IngestError::Docx(e.to_string()))?;
        if doc_xml.len() as u64 >= MAX_XML_ENTRY_BYTES {
            return Err(IngestError::Docx(
                "word/document.xml exceeds size limit".to_string(),
            ));
        }
    }

    paragraphs_from_document_xml(&doc_xml)
}

fn paragraphs_from_document_xml(xml: &[u8]) -> Result<String, IngestError> {
    use quick_xml::events::Event;

    let mut out = String::new();
    let mut reader = quick_xml::Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => in_text_run = true,
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                // Paragraph boundary: mirror the one-line-per-paragraph shape
                // the rest of the pipeline expects from word processors.
                b"p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text_run => {
                let text = t
                    .unescape()
                    .map_err(|e| IngestError::Docx(e.to_string()))?;
                out.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(IngestError::Docx(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}
