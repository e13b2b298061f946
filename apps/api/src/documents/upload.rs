//! Multipart upload parsing and file-type checks shared by every document endpoint.

use axum::extract::Multipart;
use axum::http::StatusCode;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const TXT_MIME: &str = "text/plain";

const FILE_FIELD: &str = "file";
const JOB_DESCRIPTION_FIELD: &str = "job_description";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
    Txt,
    Other,
}

impl DocumentKind {
    /// Extension wins; the part's content type is the fallback for extension-less names.
    pub fn detect(file_name: &str, content_type: Option<&str>) -> Self {
        let extension = std::path::Path::new(file_name)
            .extension()
            .and_then(|v| v.to_str())
            .map(|v| v.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => return DocumentKind::Pdf,
            "docx" => return DocumentKind::Docx,
            "txt" | "text" => return DocumentKind::Txt,
            "" => {}
            _ => return DocumentKind::Other,
        }

        let mime = content_type
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase())
            .unwrap_or_default();

        match mime.as_str() {
            PDF_MIME => DocumentKind::Pdf,
            DOCX_MIME => DocumentKind::Docx,
            TXT_MIME => DocumentKind::Txt,
            _ => DocumentKind::Other,
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            DocumentKind::Pdf => PDF_MIME,
            DocumentKind::Docx => DOCX_MIME,
            DocumentKind::Txt => TXT_MIME,
            DocumentKind::Other => "application/octet-stream",
        }
    }

    pub fn is_resume(self) -> bool {
        matches!(self, DocumentKind::Pdf | DocumentKind::Docx)
    }
}

/// A single uploaded file held in memory.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub kind: DocumentKind,
    pub data: Bytes,
}

/// Fields of interest from an upload form.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub job_description: Option<String>,
}

impl UploadForm {
    /// Drains the multipart stream. Unknown fields are skipped.
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some(FILE_FIELD) => {
                    let file_name = field.file_name().unwrap_or("document").to_string();
                    let content_type = field.content_type().map(str::to_string);
                    let data = field.bytes().await.map_err(multipart_error)?;
                    let kind = DocumentKind::detect(&file_name, content_type.as_deref());

                    info!("Received file: {} ({} bytes, {:?})", file_name, data.len(), kind);
                    form.file = Some(UploadedFile {
                        file_name,
                        kind,
                        data,
                    });
                }
                Some(JOB_DESCRIPTION_FIELD) => {
                    form.job_description = Some(field.text().await.map_err(multipart_error)?);
                }
                _ => {}
            }
        }

        Ok(form)
    }

    /// The uploaded file, or a validation error when it is absent or empty.
    pub fn require_file(&mut self) -> Result<UploadedFile, AppError> {
        match self.file.take() {
            Some(file) if !file.data.is_empty() => Ok(file),
            _ => Err(AppError::Validation("Please upload a file.".to_string())),
        }
    }

    /// The job description text, or a validation error when it is missing or blank.
    pub fn require_job_description(&mut self) -> Result<String, AppError> {
        match self.job_description.take() {
            Some(jd) if !jd.trim().is_empty() => Ok(jd),
            _ => Err(AppError::Validation(
                "Please enter the job description.".to_string(),
            )),
        }
    }
}

/// Resume flows accept PDF and DOCX only.
pub fn ensure_resume(file: &UploadedFile) -> Result<(), AppError> {
    if file.kind.is_resume() {
        Ok(())
    } else {
        Err(AppError::UnsupportedMediaType(
            "Invalid resume file type. Please upload PDF or DOCX.".to_string(),
        ))
    }
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::Validation(format!("Multipart error: {}", err.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_extension_is_case_insensitive() {
        assert_eq!(DocumentKind::detect("CV.PDF", None), DocumentKind::Pdf);
        assert_eq!(DocumentKind::detect("resume.Docx", None), DocumentKind::Docx);
        assert_eq!(DocumentKind::detect("notes.txt", None), DocumentKind::Txt);
    }

    #[test]
    fn test_extension_beats_content_type() {
        assert_eq!(
            DocumentKind::detect("sheet.xlsx", Some(PDF_MIME)),
            DocumentKind::Other
        );
    }

    #[test]
    fn test_detect_falls_back_to_content_type() {
        assert_eq!(
            DocumentKind::detect("resume", Some("application/pdf; charset=binary")),
            DocumentKind::Pdf
        );
        assert_eq!(DocumentKind::detect("resume", Some(DOCX_MIME)), DocumentKind::Docx);
        assert_eq!(DocumentKind::detect("resume", None), DocumentKind::Other);
    }

    #[test]
    fn test_only_pdf_and_docx_are_resumes() {
        let file = |kind| UploadedFile {
            file_name: "x".to_string(),
            kind,
            data: Bytes::from_static(b"x"),
        };
        assert!(ensure_resume(&file(DocumentKind::Pdf)).is_ok());
        assert!(ensure_resume(&file(DocumentKind::Docx)).is_ok());
        assert!(matches!(
            ensure_resume(&file(DocumentKind::Txt)),
            Err(AppError::UnsupportedMediaType(_))
        ));
    }

    #[test]
    fn test_require_file_rejects_empty_upload() {
        let mut form = UploadForm {
            file: Some(UploadedFile {
                file_name: "empty.pdf".to_string(),
                kind: DocumentKind::Pdf,
                data: Bytes::new(),
            }),
            job_description: None,
        };
        assert!(matches!(form.require_file(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_require_job_description_rejects_blank() {
        let mut form = UploadForm {
            file: None,
            job_description: Some("  \n ".to_string()),
        };
        assert!(matches!(
            form.require_job_description(),
            Err(AppError::Validation(_))
        ));
    }
}
