//! Document → Markdown conversion for PDF, DOCX, and plain-text uploads.
//!
//! Extraction is CPU-bound and runs on the blocking pool. Extracted text is capped at
//! `max_extracted_bytes`, since a small compressed DOCX can inflate enormously.

use std::io::{Cursor, Read};

use bytes::Bytes;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::documents::upload::DocumentKind;

const DOCX_BODY_PART: &str = "word/document.xml";

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("unsupported document type: {0}")]
    Unsupported(String),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),

    #[error("conversion task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertedDocument {
    pub file_name: String,
    pub kind: DocumentKind,
    pub markdown: String,
    /// Words in the extracted body, excluding the generated title line.
    pub word_count: usize,
}

impl ConvertedDocument {
    pub fn has_content(&self) -> bool {
        self.word_count > 0
    }
}

/// Converts an uploaded document to Markdown on the blocking pool.
pub async fn convert_document(
    file_name: String,
    kind: DocumentKind,
    data: Bytes,
    max_extracted_bytes: usize,
) -> Result<ConvertedDocument, ConversionError> {
    tokio::task::spawn_blocking(move || {
        convert_bytes(&file_name, kind, &data, max_extracted_bytes)
    })
    .await?
}

/// Synchronous conversion entry point.
pub fn convert_bytes(
    file_name: &str,
    kind: DocumentKind,
    data: &[u8],
    max_extracted_bytes: usize,
) -> Result<ConvertedDocument, ConversionError> {
    let body = match kind {
        DocumentKind::Pdf => pdf_to_markdown(data, max_extracted_bytes)?,
        DocumentKind::Docx => docx_to_markdown(data, max_extracted_bytes)?,
        DocumentKind::Txt => normalize_paragraphs(&String::from_utf8_lossy(data)),
        DocumentKind::Other => return Err(ConversionError::Unsupported(file_name.to_string())),
    };

    let word_count = body.split_whitespace().count();
    if word_count == 0 {
        warn!("Converted document '{}' is empty", file_name);
    } else {
        debug!("Converted '{}' ({:?}): {} words", file_name, kind, word_count);
    }

    let markdown = format!("# Converted Content: {file_name}\n\n{body}")
        .trim()
        .to_string();

    Ok(ConvertedDocument {
        file_name: file_name.to_string(),
        kind,
        markdown,
        word_count,
    })
}

fn pdf_to_markdown(data: &[u8], limit: usize) -> Result<String, ConversionError> {
    let text =
        pdf_extract::extract_text_from_mem(data).map_err(|e| ConversionError::Pdf(e.to_string()))?;
    if text.len() > limit {
        return Err(ConversionError::Pdf(too_large(limit)));
    }
    Ok(normalize_paragraphs(&text))
}

/// Trims every line and collapses runs of blank lines to a single paragraph break.
fn normalize_paragraphs(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim) {
        if line.is_empty() && out.last().map_or(true, |l| l.is_empty()) {
            continue;
        }
        out.push(line);
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out.join("\n")
}

fn docx_to_markdown(data: &[u8], limit: usize) -> Result<String, ConversionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data)).map_err(docx_err)?;
    let body_part = archive.by_name(DOCX_BODY_PART).map_err(docx_err)?;
    // Declared size is untrusted; the read is bounded as well.
    if body_part.size() > limit as u64 {
        return Err(ConversionError::Docx(too_large(limit)));
    }
    let mut raw = Vec::new();
    body_part
        .take(limit as u64 + 1)
        .read_to_end(&mut raw)
        .map_err(docx_err)?;
    if raw.len() > limit {
        return Err(ConversionError::Docx(too_large(limit)));
    }
    let xml = String::from_utf8(raw).map_err(docx_err)?;

    let mut reader = Reader::from_str(&xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut heading_level: Option<usize> = None;
    let mut in_paragraph = false;
    let mut in_text = false;

    loop {
        match reader.read_event().map_err(docx_err)? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => {
                    in_paragraph = true;
                    heading_level = None;
                    current.clear();
                }
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:pStyle" if in_paragraph => heading_level = heading_level_of(&e),
                b"w:tab" if in_paragraph => current.push('\t'),
                b"w:br" if in_paragraph => current.push(' '),
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => {
                    let text = current.trim();
                    if !text.is_empty() {
                        paragraphs.push(match heading_level {
                            Some(level) => format!("{} {}", "#".repeat(level), text),
                            None => text.to_string(),
                        });
                    }
                    current.clear();
                    in_paragraph = false;
                }
                _ => {}
            },
            Event::Text(e) if in_text => {
                current.push_str(&e.xml_content().map_err(docx_err)?);
            }
            Event::GeneralRef(e) if in_text => {
                if let Some(ch) = e.resolve_char_ref().map_err(docx_err)? {
                    current.push(ch);
                } else {
                    current.push_str(match &*e {
                        b"amp" => "&",
                        b"lt" => "<",
                        b"gt" => ">",
                        b"quot" => "\"",
                        b"apos" => "'",
                        _ => "",
                    });
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs.join("\n\n"))
}

fn too_large(limit: usize) -> String {
    format!("extracted text exceeds the {limit}-byte limit")
}

fn docx_err(e: impl std::fmt::Display) -> ConversionError {
    ConversionError::Docx(e.to_string())
}

/// `Title` → 1, `HeadingN` → N + 1 (capped at 6); body styles → None.
fn heading_level_of(style: &BytesStart) -> Option<usize> {
    let attr = style.try_get_attribute("w:val").ok().flatten()?;
    let value = std::str::from_utf8(&attr.value).ok()?;

    if value.eq_ignore_ascii_case("title") {
        return Some(1);
    }
    let level: usize = value
        .strip_prefix("Heading")
        .or_else(|| value.strip_prefix("heading"))?
        .trim()
        .parse()
        .ok()?;
    (level > 0).then(|| (level + 1).min(6))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const LIMIT: usize = 1024 * 1024;

    fn build_docx(document_xml: &str) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut buf);
            zip.start_file(
                DOCX_BODY_PART,
                zip::write::SimpleFileOptions::default()
                    .compression_method(zip::CompressionMethod::Deflated),
            )
            .unwrap();
            zip.write_all(document_xml.as_bytes()).unwrap();
            zip.finish().unwrap();
        }
        buf.into_inner()
    }

    const DOCX_XML: &str = concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#,
        r#"<w:p><w:pPr><w:pStyle w:val="Title"/></w:pPr><w:r><w:t>Jane Doe</w:t></w:r></w:p>"#,
        r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Experience</w:t></w:r></w:p>"#,
        r#"<w:p><w:r><w:t xml:space="preserve">Led R&amp;D for </w:t></w:r><w:r><w:t>Python services</w:t></w:r></w:p>"#,
        r#"<w:p></w:p>"#,
        r#"</w:body></w:document>"#
    );

    #[test]
    fn test_docx_paragraphs_and_headings() {
        let doc =
            convert_bytes("cv.docx", DocumentKind::Docx, &build_docx(DOCX_XML), LIMIT).unwrap();
        assert_eq!(
            doc.markdown,
            "# Converted Content: cv.docx\n\n# Jane Doe\n\n## Experience\n\nLed R&D for Python services"
        );
        assert!(doc.has_content());
        assert_eq!(doc.kind, DocumentKind::Docx);
    }

    #[test]
    fn test_docx_without_document_xml_fails() {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut buf);
            zip.start_file("other.xml", zip::write::SimpleFileOptions::default())
                .unwrap();
            zip.write_all(b"<x/>").unwrap();
            zip.finish().unwrap();
        }
        let err =
            convert_bytes("cv.docx", DocumentKind::Docx, &buf.into_inner(), LIMIT).unwrap_err();
        assert!(matches!(err, ConversionError::Docx(_)));
    }

    #[test]
    fn test_docx_inflating_past_limit_is_rejected() {
        let filler = "<w:p><w:r><w:t>python python python python</w:t></w:r></w:p>".repeat(20_000);
        let xml = format!(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{filler}</w:body></w:document>"#
        );
        let docx = build_docx(&xml);
        let limit = 64 * 1024;
        assert!(docx.len() < limit, "fixture should compress below the limit");

        let err = convert_bytes("bomb.docx", DocumentKind::Docx, &docx, limit).unwrap_err();
        match err {
            ConversionError::Docx(msg) => assert!(msg.contains("exceeds"), "{msg}"),
            other => panic!("unexpected error: {other}"),
        }

        assert!(convert_bytes("bomb.docx", DocumentKind::Docx, &docx, xml.len()).is_ok());
    }

    #[test]
    fn test_text_passthrough_collapses_blank_runs() {
        let doc = convert_bytes(
            "notes.txt",
            DocumentKind::Txt,
            b"  Line 1 of the text file.\n\n\n\nLine 2  \n\n",
            LIMIT,
        )
        .unwrap();
        assert_eq!(
            doc.markdown,
            "# Converted Content: notes.txt\n\nLine 1 of the text file.\n\nLine 2"
        );
        assert_eq!(doc.word_count, 8);
    }

    #[test]
    fn test_empty_text_converts_without_content() {
        let doc = convert_bytes("blank.txt", DocumentKind::Txt, b"   \n  ", LIMIT).unwrap();
        assert!(!doc.has_content());
        assert_eq!(doc.markdown, "# Converted Content: blank.txt");
    }

    #[test]
    fn test_invalid_pdf_reports_pdf_error() {
        let err = convert_bytes("cv.pdf", DocumentKind::Pdf, b"not a pdf", LIMIT).unwrap_err();
        assert!(matches!(err, ConversionError::Pdf(_)));
    }

    #[test]
    fn test_other_kind_is_unsupported() {
        let err = convert_bytes("sheet.xlsx", DocumentKind::Other, b"PK", LIMIT).unwrap_err();
        assert!(matches!(err, ConversionError::Unsupported(name) if name == "sheet.xlsx"));
    }

    #[tokio::test]
    async fn test_convert_document_runs_on_blocking_pool() {
        let doc = convert_document(
            "a.txt".to_string(),
            DocumentKind::Txt,
            Bytes::from_static(b"hello world"),
            LIMIT,
        )
        .await
        .unwrap();
        assert_eq!(doc.word_count, 2);
    }
}
