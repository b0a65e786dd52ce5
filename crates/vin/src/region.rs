//! 지역별 디코더
//!
//! 각 지역은 자기 WMI 테이블로 제조사를 결정한 뒤 공통 모델/엔진/트림 테이블을
//! 조회합니다. WMI가 없으면 범용 디코더로, 제조사가 닛산이면 닛산 디코더로 넘어갑니다.

use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;

use junkyard_core::types::{BodyType, DecodedVehicleAttributes};
use junkyard_core::vin::Vin;

use crate::tables::{self, NISSAN, UNKNOWN};

/// 디코딩 지역
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// 닛산 전용 (1N, 3N, 5N, JN)
    Nissan,
    /// 미국 (1, 4, 5)
    UnitedStates,
    /// 일본 (J)
    Japan,
    /// 독일 (W)
    Germany,
    /// 한국 (K, M, S)
    Korea,
    /// 범용 (규칙 없음 또는 WMI 미등록)
    Generic,
}

impl Region {
    /// 지역 WMI 테이블 (닛산/범용은 없음)
    fn wmi_table(self) -> Option<&'static [(&'static str, &'static str)]> {
        match self {
            Self::UnitedStates => Some(tables::US_WMI),
            Self::Japan => Some(tables::JAPAN_WMI),
            Self::Germany => Some(tables::GERMANY_WMI),
            Self::Korea => Some(tables::KOREA_WMI),
            Self::Nissan | Self::Generic => None,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nissan => write!(f, "nissan"),
            Self::UnitedStates => write!(f, "us"),
            Self::Japan => write!(f, "japan"),
            Self::Germany => write!(f, "germany"),
            Self::Korea => write!(f, "korea"),
            Self::Generic => write!(f, "generic"),
        }
    }
}

/// 지정한 지역 디코더로 VIN을 해석합니다.
///
/// 실제로 결과를 만든 지역을 함께 반환합니다. 지역 WMI 테이블에 없는 VIN은
/// [`Region::Generic`], 제조사가 닛산으로 확인된 VIN은 [`Region::Nissan`] 입니다.
pub fn decode_in<R: Rng + ?Sized>(
    region: Region,
    vin: &Vin,
    rng: &mut R,
) -> (Region, DecodedVehicleAttributes) {
    match region {
        Region::Nissan => (Region::Nissan, decode_nissan(vin)),
        Region::Generic => (Region::Generic, decode_generic(vin, rng)),
        _ => {
            let make = region
                .wmi_table()
                .and_then(|table| tables::lookup_wmi(table, vin.as_str()));
            match make {
                Some(NISSAN) => (Region::Nissan, decode_nissan(vin)),
                Some(make) => (region, decode_with_make(vin, make)),
                None => (Region::Generic, decode_generic(vin, rng)),
            }
        }
    }
}

/// 공통 테이블로 모델/엔진/트림을 채웁니다.
fn decode_with_make(vin: &Vin, make: &str) -> DecodedVehicleAttributes {
    let (model, body_type) = tables::lookup_model(tables::MODELS, vin.as_str())
        .map(|entry| (entry.model, entry.body))
        .unwrap_or((UNKNOWN, BodyType::Unknown));

    let engine = vin
        .char_at(8)
        .and_then(|code| tables::lookup_keyed(tables::ENGINES, make, code))
        .unwrap_or(UNKNOWN);
    let trim = vin
        .char_at(7)
        .and_then(|code| tables::lookup_keyed(tables::TRIMS, make, code))
        .unwrap_or(UNKNOWN);

    DecodedVehicleAttributes {
        make: make.to_owned(),
        model: model.to_owned(),
        year: tables::model_year_or_default(vin.model_year_code()),
        color: None,
        engine: engine.to_owned(),
        trim: trim.to_owned(),
        body_type,
    }
}

/// 닛산 전용 테이블 (엔진은 5번째, 트림은 7번째 문자)
fn decode_nissan(vin: &Vin) -> DecodedVehicleAttributes {
    let (model, body_type) = tables::lookup_model(tables::NISSAN_MODELS, vin.as_str())
        .map(|entry| (entry.model, entry.body))
        .unwrap_or((UNKNOWN, BodyType::Unknown));

    let engine = vin
        .char_at(5)
        .and_then(|code| tables::lookup_char(tables::NISSAN_ENGINES, code))
        .unwrap_or(UNKNOWN);
    let trim = vin
        .char_at(7)
        .and_then(|code| tables::lookup_char(tables::NISSAN_TRIMS, code))
        .unwrap_or(UNKNOWN);

    DecodedVehicleAttributes {
        make: NISSAN.to_owned(),
        model: model.to_owned(),
        year: tables::model_year_or_default(vin.model_year_code()),
        color: None,
        engine: engine.to_owned(),
        trim: trim.to_owned(),
        body_type,
    }
}

/// 첫 문자로 제조사를 추정하고 나머지는 후보 풀에서 무작위로 고릅니다.
fn decode_generic<R: Rng + ?Sized>(vin: &Vin, rng: &mut R) -> DecodedVehicleAttributes {
    let make = vin.char_at(1).map(tables::generic_make).unwrap_or(UNKNOWN);

    DecodedVehicleAttributes {
        make: make.to_owned(),
        model: pick(tables::generic_models(make), rng),
        year: tables::model_year_or_default(vin.model_year_code()),
        color: Some(pick(tables::GENERIC_COLORS, rng)),
        engine: pick(tables::GENERIC_ENGINES, rng),
        trim: pick(tables::GENERIC_TRIMS, rng),
        body_type: BodyType::Unknown,
    }
}

fn pick<R: Rng + ?Sized>(pool: &[&str], rng: &mut R) -> String {
    pool.choose(rng).copied().unwrap_or(UNKNOWN).to_owned()
}
