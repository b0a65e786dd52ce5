//! VIN 디코더: 순서가 있는 접두사 디스패치 테이블
//!
//! [`VinDecoder`]는 [`DispatchRule`] 목록을 우선순위대로 평가하여 첫 번째로 일치하는
//! 지역 디코더를 선택합니다. 일치하는 규칙이 없으면 범용 디코더를 사용합니다.
//!
//! 기본 규칙 (먼저 일치한 규칙 우선):
//!
//! | 순서 | 조건 | 지역 |
//! |---|---|---|
//! | 1 | `1N`, `3N`, `5N`, `JN` | 닛산 |
//! | 2 | `1`, `4`, `5` | 미국 |
//! | 3 | `J` | 일본 |
//! | 4 | `W` | 독일 |
//! | 5 | `K`, `M`, `S` | 한국 |

use rand::Rng;
use tracing::debug;

use junkyard_core::types::DecodedVehicleAttributes;
use junkyard_core::vin::Vin;

use crate::region::{self, Region};
use crate::tables::NISSAN_PREFIXES;

/// 디스패치 규칙: 접두사 조건과 지역 디코더의 쌍
#[derive(Debug, Clone, Copy)]
pub struct DispatchRule {
    /// 규칙 이름 (로그용)
    pub name: &'static str,
    /// 접두사 조건
    pub matches: fn(&Vin) -> bool,
    /// 선택할 지역
    pub region: Region,
}

fn is_nissan_prefix(vin: &Vin) -> bool {
    NISSAN_PREFIXES.contains(&vin.prefix(2))
}

fn first_char_in(vin: &Vin, set: &[char]) -> bool {
    vin.char_at(1).is_some_and(|c| set.contains(&c))
}

/// 기본 디스패치 규칙
pub const DEFAULT_RULES: &[DispatchRule] = &[
    DispatchRule {
        name: "nissan",
        matches: is_nissan_prefix,
        region: Region::Nissan,
    },
    DispatchRule {
        name: "us",
        matches: |vin| first_char_in(vin, &['1', '4', '5']),
        region: Region::UnitedStates,
    },
    DispatchRule {
        name: "japan",
        matches: |vin| first_char_in(vin, &['J']),
        region: Region::Japan,
    },
    DispatchRule {
        name: "germany",
        matches: |vin| first_char_in(vin, &['W']),
        region: Region::Germany,
    },
    DispatchRule {
        name: "korea",
        matches: |vin| first_char_in(vin, &['K', 'M', 'S']),
        region: Region::Korea,
    },
];

/// 디코딩 결과와 이를 만든 지역
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub region: Region,
    pub attributes: DecodedVehicleAttributes,
}

/// VIN 디코더
#[derive(Debug, Clone)]
pub struct VinDecoder {
    rules: Vec<DispatchRule>,
}

impl VinDecoder {
    /// 기본 규칙으로 디코더를 생성합니다.
    pub fn new() -> Self {
        Self::with_rules(DEFAULT_RULES.to_vec())
    }

    /// 주어진 규칙 목록으로 디코더를 생성합니다. 목록 순서가 우선순위입니다.
    pub fn with_rules(rules: Vec<DispatchRule>) -> Self {
        Self { rules }
    }

    /// 규칙 목록
    pub fn rules(&self) -> &[DispatchRule] {
        &self.rules
    }

    /// 첫 번째로 일치하는 규칙을 반환합니다.
    pub fn select_rule(&self, vin: &Vin) -> Option<&DispatchRule> {
        self.rules.iter().find(|rule| (rule.matches)(vin))
    }

    /// 첫 번째로 일치하는 규칙의 지역을 반환합니다. 없으면 [`Region::Generic`].
    pub fn select_region(&self, vin: &Vin) -> Region {
        self.select_rule(vin)
            .map(|rule| rule.region)
            .unwrap_or(Region::Generic)
    }

    /// 원시 문자열을 정규화/검증한 뒤 디코딩합니다.
    ///
    /// 형식 검증에 실패하면 `None`을 반환하며, 호출자는 수동 입력으로 전환해야 합니다.
    pub fn decode(&self, raw: &str) -> Option<Decoded> {
        match Vin::parse(raw) {
            Ok(vin) => Some(self.decode_vin(&vin)),
            Err(e) => {
                debug!(input = raw, error = %e, "unable to decode VIN");
                None
            }
        }
    }

    /// 검증된 VIN을 디코딩합니다. 테이블에 없는 값은 기본값으로 채워집니다.
    pub fn decode_vin(&self, vin: &Vin) -> Decoded {
        self.decode_vin_with_rng(vin, &mut rand::thread_rng())
    }

    /// 범용 디코더가 사용할 난수 생성기를 지정하여 디코딩합니다.
    pub fn decode_vin_with_rng<R: Rng + ?Sized>(&self, vin: &Vin, rng: &mut R) -> Decoded {
        let rule = self.select_rule(vin);
        let selected = rule.map(|r| r.region).unwrap_or(Region::Generic);
        let (region, attributes) = region::decode_in(selected, vin, rng);
        debug!(
            vin = %vin,
            rule = rule.map(|r| r.name).unwrap_or("fallback"),
            selected = %selected,
            region = %region,
            make = attributes.make.as_str(),
            model = attributes.model.as_str(),
            year = attributes.year,
            "VIN decoded"
        );
        Decoded { region, attributes }
    }
}

impl Default for VinDecoder {
    fn default() -> Self {
        Self::new()
    }
}
