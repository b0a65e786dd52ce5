//! VIN 조회 에러 타입
//!
//! [`LookupError`]는 원격 차량 정보 조회에서 발생하는 에러를 표현합니다.
//! 로컬 디코딩은 실패하지 않으므로(기본값으로 대체) 별도 에러가 없습니다.
//! `From<LookupError> for JunkyardError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 전파할 수 있습니다.

use junkyard_core::error::{JunkyardError, LookupFailure};

/// 원격 조회 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// HTTP 클라이언트 생성 실패
    #[error("client build failed: {0}")]
    Client(String),

    /// 네트워크/전송 실패 (연결 거부, 타임아웃 등)
    #[error("transport error: {0}")]
    Transport(String),

    /// 성공이 아닌 HTTP 상태 코드
    #[error("unexpected status: {0}")]
    Status(u16),

    /// 응답 본문을 해석할 수 없음
    #[error("malformed response: {0}")]
    Malformed(String),

    /// 필수 필드가 응답에 없음
    #[error("missing field in response: {0}")]
    MissingField(String),
}

impl From<LookupError> for JunkyardError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::Client(_) | LookupError::Transport(_) | LookupError::Status(_) => {
                JunkyardError::Lookup(LookupFailure::Transport(err.to_string()))
            }
            LookupError::Malformed(_) | LookupError::MissingField(_) => {
                JunkyardError::Lookup(LookupFailure::Malformed(err.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_display() {
        let err = LookupError::Status(503);
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn transport_converts_to_lookup_transport() {
        let err: JunkyardError = LookupError::Transport("connection refused".to_owned()).into();
        assert!(matches!(
            err,
            JunkyardError::Lookup(LookupFailure::Transport(_))
        ));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn missing_field_converts_to_lookup_malformed() {
        let err: JunkyardError = LookupError::MissingField("Make".to_owned()).into();
        assert!(matches!(
            err,
            JunkyardError::Lookup(LookupFailure::Malformed(_))
        ));
    }
}
