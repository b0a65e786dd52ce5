//! 첨부 파일 인코딩
//!
//! 파일을 비동기로 읽어 `data:<mime>;base64,<payload>` URL로 인코딩합니다.
//! 크기 제한을 넘는 파일은 읽지 않고 거부합니다.

use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use tracing::{debug, warn};

use junkyard_core::types::AttachmentRecord;

use crate::error::InventoryError;

/// 알 수 없는 확장자의 MIME 타입
pub const DEFAULT_MIME: &str = "application/octet-stream";

/// 확장자로 MIME 타입을 추정합니다.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        Some("json") => "application/json",
        Some("csv") => "text/csv",
        _ => DEFAULT_MIME,
    }
}

/// 바이트를 data URL로 인코딩합니다.
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// 파일을 읽어 첨부 레코드를 만듭니다.
///
/// # Errors
///
/// - 파일 크기가 `max_size`를 넘으면 [`InventoryError::AttachmentTooLarge`]
/// - 파일을 읽을 수 없으면 [`InventoryError::AttachmentIo`]
pub async fn read_attachment(
    path: impl AsRef<Path>,
    max_size: u64,
) -> Result<AttachmentRecord, InventoryError> {
    let path = path.as_ref();
    let io_err = |source: std::io::Error| InventoryError::AttachmentIo {
        path: path.display().to_string(),
        source,
    };

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let metadata = tokio::fs::metadata(path).await.map_err(io_err)?;
    if metadata.len() > max_size {
        warn!(
            file = file_name.as_str(),
            size = metadata.len(),
            max_size,
            "attachment rejected: too large"
        );
        return Err(InventoryError::AttachmentTooLarge {
            name: file_name,
            size: metadata.len(),
            max: max_size,
        });
    }

    let bytes = tokio::fs::read(path).await.map_err(io_err)?;
    // 메타데이터 확인 이후 파일이 커졌을 수 있음
    let size = bytes.len() as u64;
    if size > max_size {
        return Err(InventoryError::AttachmentTooLarge {
            name: file_name,
            size,
            max: max_size,
        });
    }

    let mime_type = mime_for_path(path);
    debug!(file = file_name.as_str(), mime_type, size, "attachment encoded");

    Ok(AttachmentRecord {
        id: uuid::Uuid::new_v4().to_string(),
        file_name,
        mime_type: mime_type.to_owned(),
        size,
        content: encode_data_url(mime_type, &bytes),
        uploaded_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_by_extension() {
        assert_eq!(mime_for_path(Path::new("a/photo.JPG")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("title.pdf")), "application/pdf");
        assert_eq!(mime_for_path(Path::new("notes")), DEFAULT_MIME);
        assert_eq!(mime_for_path(Path::new("x.bin")), DEFAULT_MIME);
    }

    #[test]
    fn data_url_format() {
        assert_eq!(encode_data_url("text/plain", b"hi"), "data:text/plain;base64,aGk=");
    }

    #[tokio::test]
    async fn reads_and_encodes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("receipt.txt");
        std::fs::write(&path, b"sold").unwrap();

        let record = read_attachment(&path, 1024).await.unwrap();
        assert_eq!(record.file_name, "receipt.txt");
        assert_eq!(record.mime_type, "text/plain");
        assert_eq!(record.size, 4);
        assert_eq!(record.content, "data:text/plain;base64,c29sZA==");
    }

    #[tokio::test]
    async fn rejects_oversized_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.png");
        std::fs::write(&path, vec![0u8; 16]).unwrap();

        let err = read_attachment(&path, 8).await.unwrap_err();
        assert!(matches!(
            err,
            InventoryError::AttachmentTooLarge { size: 16, max: 8, .. }
        ));
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_attachment(dir.path().join("nope.jpg"), 8)
            .await
            .unwrap_err();
        assert!(matches!(err, InventoryError::AttachmentIo { .. }));
    }
}
