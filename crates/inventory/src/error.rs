//! 재고 에러 타입
//!
//! [`InventoryError`]는 재고 저장소, 카탈로그, 첨부 파일 처리에서 발생하는 에러입니다.
//! `From<InventoryError> for JunkyardError` 변환으로 상위 레이어에 전파됩니다.

use junkyard_core::error::{JunkyardError, ResourceError, StorageError, ValidationError};

/// 재고 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    /// 입력 검증 실패 (필수 필드 누락, 잘못된 VIN, 중복 VIN)
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// 저장소 읽기/쓰기 실패
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// 첨부 파일 크기 초과
    #[error("attachment too large: {name}: {size} bytes (max: {max})")]
    AttachmentTooLarge { name: String, size: u64, max: u64 },

    /// 첨부 파일 I/O 실패
    #[error("attachment io error: {path}: {source}")]
    AttachmentIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<InventoryError> for JunkyardError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::Validation(e) => JunkyardError::Validation(e),
            InventoryError::Storage(e) => JunkyardError::Storage(e),
            InventoryError::AttachmentTooLarge { name, size, max } => {
                JunkyardError::Resource(ResourceError::FileTooLarge { name, size, max })
            }
            InventoryError::AttachmentIo { source, .. } => JunkyardError::Io(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_is_transparent() {
        let err: InventoryError = ValidationError::MissingField {
            field: "price".to_owned(),
        }
        .into();
        assert_eq!(err.to_string(), "missing required field: price");
    }

    #[test]
    fn too_large_maps_to_resource_error() {
        let err = InventoryError::AttachmentTooLarge {
            name: "scan.pdf".to_owned(),
            size: 10,
            max: 5,
        };
        let top: JunkyardError = err.into();
        assert!(matches!(
            top,
            JunkyardError::Resource(ResourceError::FileTooLarge { .. })
        ));
    }

    #[test]
    fn attachment_io_maps_to_io() {
        let err = InventoryError::AttachmentIo {
            path: "/missing".to_owned(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("/missing"));
        let top: JunkyardError = err.into();
        assert!(matches!(top, JunkyardError::Io(_)));
    }
}
