//! 스캐너 에러 타입
//!
//! [`ScannerError`]는 카메라 획득, 프레임 스트림, 파이프라인 상태 전이에서 발생하는 에러입니다.
//! `From<ScannerError> for JunkyardError` 변환으로 상위 레이어에 전파됩니다.

use junkyard_core::error::{JunkyardError, ResourceError};

use crate::pipeline::ScanState;

/// 스캐너 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum ScannerError {
    /// 카메라 접근 거부
    #[error("camera access denied: {0}")]
    CameraDenied(String),

    /// 카메라 스트림이 검출 전에 끝남
    #[error("camera stream ended before a VIN was captured")]
    StreamEnded,

    /// 현재 상태에서 허용되지 않는 작업
    #[error("cannot {operation} while scanner is {state}")]
    InvalidState {
        /// 요청된 작업
        operation: &'static str,
        /// 현재 상태
        state: ScanState,
    },

    /// 프레임 스크립트 파일 읽기 실패
    #[error("failed to read frame script {path}: {source}")]
    FrameScript {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<ScannerError> for JunkyardError {
    fn from(err: ScannerError) -> Self {
        match err {
            ScannerError::CameraDenied(reason) => {
                JunkyardError::Resource(ResourceError::CameraDenied(reason))
            }
            ScannerError::StreamEnded => JunkyardError::Resource(ResourceError::StreamEnded),
            e @ ScannerError::InvalidState { .. } => {
                JunkyardError::Resource(ResourceError::InvalidState(e.to_string()))
            }
            ScannerError::FrameScript { source, .. } => JunkyardError::Io(source),
        }
    }
}
