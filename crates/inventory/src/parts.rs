//! 부품 생성기
//!
//! 디코딩된 차량 정보로 부품 목록을 만듭니다.
//!
//! 1. 제조사와 호환되는 카탈로그 엔트리 (이름순, 출처 `catalog`)
//! 2. 필수 부품 (`engine`, `transmission`, `battery`, `alternator`, `wheels`)
//! 3. 차체 유형별 추가 부품 (트럭: `tailgate`, `bedliner` / SUV·밴: `seats`, `rearhatch` /
//!    그 외: `doors`, `hood`)
//!
//! 2, 3단계는 이미 같은 이름(대소문자 무시)의 부품이 있으면 건너뜁니다.

use rust_decimal::{Decimal, RoundingStrategy};

use junkyard_core::types::{BodyType, PartRecord, PartSource};

use crate::catalog::PartsCatalog;

/// 필수 부품
pub const ESSENTIAL_PARTS: [&str; 5] = ["engine", "transmission", "battery", "alternator", "wheels"];

/// 자주 쓰는 부품 (드래프트 단축 입력용)
pub const COMMON_PARTS: [&str; 11] = [
    "engine",
    "transmission",
    "doors",
    "wheels",
    "battery",
    "alternator",
    "tailgate",
    "bedliner",
    "seats",
    "rearhatch",
    "hood",
];

/// 추천 가격 배수 (1.5)
pub fn suggested_price_multiplier() -> Decimal {
    Decimal::new(15, 1)
}

/// 정적 가격표. 표에 없는 부품은 0입니다.
pub fn default_price(name: &str) -> Decimal {
    let price: i64 = match name.trim().to_lowercase().as_str() {
        "engine" => 500,
        "transmission" => 300,
        "doors" => 100,
        "wheels" => 50,
        "battery" => 80,
        "alternator" => 120,
        "tailgate" => 150,
        "bedliner" => 75,
        "seats" => 120,
        "rearhatch" => 140,
        "hood" => 110,
        _ => 0,
    };
    Decimal::from(price)
}

/// 차체 유형별 추가 부품
pub fn body_extras(body: BodyType) -> &'static [&'static str] {
    match body {
        BodyType::Truck => &["tailgate", "bedliner"],
        BodyType::Suv | BodyType::Van => &["seats", "rearhatch"],
        BodyType::Car | BodyType::Unknown => &["doors", "hood"],
    }
}

fn push_unique(parts: &mut Vec<PartRecord>, name: &str, source: PartSource) {
    if parts.iter().any(|p| p.has_name(name)) {
        return;
    }
    parts.push(PartRecord::new(name, default_price(name)).with_source(source));
}

/// 부품 목록을 생성합니다.
///
/// 제조사가 비어 있으면 카탈로그를 건너뜁니다.
pub fn generate_parts(catalog: &PartsCatalog, make: &str, body: BodyType) -> Vec<PartRecord> {
    let mut parts = Vec::new();

    if !make.trim().is_empty() {
        for (name, entry) in catalog.entries_for_make(make) {
            if parts.iter().any(|p: &PartRecord| p.has_name(name)) {
                continue;
            }
            let mut part = PartRecord::new(name, entry.default_price)
                .with_source(PartSource::Catalog)
                .with_category(entry.category.as_str());
            if !entry.description.is_empty() {
                part = part.with_description(entry.description.as_str());
            }
            parts.push(part);
        }
    }

    for name in ESSENTIAL_PARTS {
        push_unique(&mut parts, name, PartSource::Essential);
    }
    for name in body_extras(body) {
        push_unique(&mut parts, name, PartSource::BodyType);
    }

    parts
}

/// 부품 가격 합계
pub fn parts_total(parts: &[PartRecord]) -> Decimal {
    parts.iter().map(|p| p.price).sum()
}

/// 추천 판매가: 부품 합계 × 1.5, 소수점 둘째 자리 반올림
pub fn suggested_price(parts: &[PartRecord]) -> Decimal {
    (parts_total(parts) * suggested_price_multiplier())
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
