//! PDF resume intake. Extracted text goes to the profile, the file to S3.

use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;

pub const MAX_PDF_BYTES: usize = 10 * 1024 * 1024;
const PDF_MAGIC: &[u8] = b"%PDF-";

pub fn resume_pdf_key(user_id: Uuid, file_id: Uuid) -> String {
    format!("resumes/{user_id}/{file_id}.pdf")
}

/// Cheap checks before handing bytes to the extractor.
pub fn validate_pdf(bytes: &[u8]) -> Result<(), AppError> {
    if bytes.is_empty() {
        return Err(AppError::Validation("uploaded file is empty".to_string()));
    }
    if bytes.len() > MAX_PDF_BYTES {
        return Err(AppError::Validation(format!(
            "file exceeds {} MB",
            MAX_PDF_BYTES / (1024 * 1024)
        )));
    }
    if !bytes.starts_with(PDF_MAGIC) {
        return Err(AppError::Validation("only PDF files are accepted".to_string()));
    }
    Ok(())
}

/// Text extraction runs on the blocking pool; large PDFs take a while.
pub async fn extract_pdf_text(bytes: Bytes) -> Result<String, AppError> {
    // The extractor panics on some malformed files; treat that like a parse error.
    let extracted = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| e.to_string())
        .and_then(|r| r.map_err(|e| e.to_string()));
    let text = extracted.map_err(|e| {
        warn!("PDF text extraction failed: {e}");
        AppError::UnprocessableEntity("could not read text from the PDF".to_string())
    })?;

    let text = normalize_whitespace(&text);
    if text.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "the PDF contains no extractable text".to_string(),
        ));
    }
    Ok(text)
}

pub async fn store_resume_pdf(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    user_id: Uuid,
    bytes: Bytes,
) -> Result<String, AppError> {
    let key = resume_pdf_key(user_id, Uuid::new_v4());
    s3.put_object()
        .bucket(bucket)
        .key(&key)
        .body(ByteStream::from(bytes))
        .content_type("application/pdf")
        .send()
        .await
        .map_err(|e| AppError::S3(format!("upload of {key} failed: {e}")))?;

    info!("Uploaded resume PDF to s3://{bucket}/{key}");
    Ok(key)
}

/// Collapses runs of spaces and drops blank lines left by the extractor.
fn normalize_whitespace(text: &str) -> String {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        let user = Uuid::nil();
        let file = Uuid::nil();
        assert_eq!(
            resume_pdf_key(user, file),
            format!("resumes/{user}/{file}.pdf")
        );
    }

    #[test]
    fn test_validate_pdf() {
        assert!(validate_pdf(b"%PDF-1.7\n...").is_ok());
        assert!(matches!(validate_pdf(b""), Err(AppError::Validation(_))));
        assert!(matches!(validate_pdf(b"PK\x03\x04"), Err(AppError::Validation(_))));
        let big = vec![b'%'; MAX_PDF_BYTES + 1];
        assert!(validate_pdf(&big).is_err());
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(
            normalize_whitespace("  Jane   Doe \n\n\n Rust  engineer\n"),
            "Jane Doe\nRust engineer"
        );
    }

    #[tokio::test]
    async fn test_garbage_pdf_is_unprocessable() {
        let err = extract_pdf_text(Bytes::from_static(b"%PDF-1.4 not really"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }
}
