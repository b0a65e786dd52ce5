#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`storage`]: 키-값 저장소 trait과 파일/메모리 구현
//! - [`store`]: 차량 재고 저장소
//! - [`catalog`]: 부품 카탈로그
//! - [`parts`]: 부품 생성기와 추천 가격
//! - [`draft`]: 차량 입력 드래프트
//! - [`attachment`]: 첨부 파일 인코딩
//! - [`dashboard`]: 재고 집계
//! - [`error`]: 재고 에러 타입

pub mod attachment;
pub mod catalog;
pub mod dashboard;
pub mod draft;
pub mod error;
pub mod parts;
pub mod storage;
pub mod store;

// --- 주요 타입 re-export ---

// 에러
pub use error::InventoryError;

// 저장소
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{InventoryStore, StoreOptions};

// 카탈로그 / 부품
pub use catalog::PartsCatalog;
pub use parts::{ESSENTIAL_PARTS, generate_parts, suggested_price};

// 드래프트 / 첨부
pub use attachment::read_attachment;
pub use draft::VehicleDraft;

// 집계
pub use dashboard::DashboardSummary;
