#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`tables`]: WMI, 모델, 엔진, 트림, 연식 코드 정적 테이블
//! - [`region`]: 지역별 디코더와 범용 디코더
//! - [`decoder`]: 접두사 디스패치 테이블 기반 [`VinDecoder`]
//! - [`lookup`]: 원격 조회 trait, vPIC 클라이언트, 로컬 대체 해석기
//! - [`error`]: 도메인 에러 타입
//!
//! # 흐름
//!
//! ```text
//! Vin -> VinResolver --(enabled)--> VpicClient --ok--> attributes
//!                 \                     |
//!                  \                  failure
//!                   v                   v
//!                 VinDecoder -> DispatchRule -> Region -> tables
//! ```

pub mod decoder;
pub mod error;
pub mod lookup;
pub mod region;
pub mod tables;

// --- 주요 타입 re-export ---

pub use decoder::{Decoded, DispatchRule, VinDecoder};
pub use error::LookupError;
pub use lookup::{LookupSource, ResolvedVehicle, VehicleLookup, VinResolver, VpicClient};
pub use region::Region;
pub use tables::{DEFAULT_MODEL_YEAR, UNKNOWN};
