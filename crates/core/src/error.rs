//! 에러 타입: 도메인별 에러 정의
//!
//! 에러는 네 가지 범주로 나뉩니다.
//!
//! - **검증**: 잘못된 VIN, 필수 필드 누락. 즉시 사용자에게 보고, 상태 변경 없음
//! - **리소스**: 카메라 권한 거부, 첨부 파일 크기 초과. 작업 중단, 리소스 누수 없음
//! - **스토리지**: 읽기/쓰기 실패. 메모리 상태가 영속 상태보다 앞설 수 있음
//! - **조회**: 원격 VIN 조회 실패. 로컬 디코더로 대체
//!
//! 디코딩 미스(알 수 없는 접두사, 연식 코드)는 에러가 아니라 기본값으로 처리됩니다.

/// Junkyard 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum JunkyardError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 입력 검증 에러
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// 리소스 에러 (카메라, 첨부 파일)
    #[error("resource error: {0}")]
    Resource(#[from] ResourceError),

    /// 스토리지 에러
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// 원격 조회 에러
    #[error("lookup error: {0}")]
    Lookup(#[from] LookupFailure),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 입력 검증 에러
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// VIN 길이가 17자가 아님
    #[error("VIN must be 17 characters long (got {len})")]
    VinLength { len: usize },

    /// VIN에 허용되지 않는 문자 포함 (I, O, Q 또는 영숫자 외 문자)
    #[error("VIN contains invalid character '{ch}' at position {position}")]
    VinCharacter { ch: char, position: usize },

    /// 필수 필드 누락
    #[error("missing required field: {field}")]
    MissingField { field: String },

    /// 필드 값이 허용 범위를 벗어남
    #[error("invalid value for '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    /// 이미 등록된 VIN
    #[error("vehicle with VIN {vin} already exists")]
    DuplicateVin { vin: String },
}

/// 리소스 에러
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// 카메라 접근 거부
    #[error("camera access denied: {0}")]
    CameraDenied(String),

    /// 카메라 스트림 종료
    #[error("camera stream ended unexpectedly")]
    StreamEnded,

    /// 첨부 파일 크기 초과
    #[error("file too large: {name}: {size} bytes (max: {max})")]
    FileTooLarge { name: String, size: u64, max: u64 },

    /// 현재 상태에서 허용되지 않는 작업 (예: 이미 열린 스캐너를 다시 열기)
    #[error("invalid state: {0}")]
    InvalidState(String),
}

/// 스토리지 에러
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// 키 읽기 실패
    #[error("failed to read '{key}': {reason}")]
    Read { key: String, reason: String },

    /// 키 쓰기 실패
    #[error("failed to write '{key}': {reason}")]
    Write { key: String, reason: String },

    /// 저장된 문서 형식이 현재 스키마와 맞지 않음
    #[error("corrupt document '{key}': {reason}")]
    Corrupt { key: String, reason: String },
}

/// 원격 VIN 조회 실패
#[derive(Debug, thiserror::Error)]
pub enum LookupFailure {
    /// 네트워크/전송 실패
    #[error("transport failed: {0}")]
    Transport(String),

    /// 응답 형식 오류 또는 필수 필드 누락
    #[error("malformed response: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_display_includes_length() {
        let err = ValidationError::VinLength { len: 12 };
        assert!(err.to_string().contains("17"));
        assert!(err.to_string().contains("12"));
    }

    #[test]
    fn validation_error_converts_to_junkyard_error() {
        let err: JunkyardError = ValidationError::MissingField {
            field: "make".to_owned(),
        }
        .into();
        assert!(matches!(err, JunkyardError::Validation(_)));
        assert!(err.to_string().contains("make"));
    }

    #[test]
    fn resource_error_file_too_large_display() {
        let err = ResourceError::FileTooLarge {
            name: "photo.jpg".to_owned(),
            size: 20_000_000,
            max: 5_242_880,
        };
        let msg = err.to_string();
        assert!(msg.contains("photo.jpg"));
        assert!(msg.contains("20000000"));
    }

    #[test]
    fn storage_error_converts_to_junkyard_error() {
        let err: JunkyardError = StorageError::Write {
            key: "junkyardInventory".to_owned(),
            reason: "disk full".to_owned(),
        }
        .into();
        assert!(matches!(err, JunkyardError::Storage(_)));
    }
}
