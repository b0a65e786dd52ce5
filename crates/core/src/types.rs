//! 도메인 타입: 시스템 전역에서 사용되는 공통 타입
//!
//! 차량, 부품, 첨부 파일, 부품 카탈로그, VIN 디코딩 결과를 정의합니다.
//! 재고 저장소, 디코더, 스캐너, CLI가 모두 이 타입들로 데이터를 교환합니다.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::vin::Vin;

/// 카탈로그 호환 제조사 와일드카드
pub const CATALOG_WILDCARD: &str = "ALL";

/// 위치 미입력 시 기본값
pub const DEFAULT_LOCATION: &str = "Not set";

/// 이름/검색어 비교용 대소문자 접기
///
/// 부품명 비교, 카탈로그 호환성, 재고 검색이 모두 이 규칙(유니코드 소문자화)을 따릅니다.
pub fn fold_case(s: &str) -> String {
    s.trim().to_lowercase()
}

/// 부품 상태 (품질)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PartCondition {
    /// 양호
    #[default]
    Good,
    /// 보통
    Fair,
    /// 불량
    Poor,
    /// 재생 불가 (고철)
    Salvage,
}

impl PartCondition {
    /// 문자열에서 부품 상태를 파싱합니다 (대소문자 구분 없음).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "good" => Some(Self::Good),
            "fair" => Some(Self::Fair),
            "poor" => Some(Self::Poor),
            "salvage" | "scrap" => Some(Self::Salvage),
            _ => None,
        }
    }
}

impl fmt::Display for PartCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Good => write!(f, "good"),
            Self::Fair => write!(f, "fair"),
            Self::Poor => write!(f, "poor"),
            Self::Salvage => write!(f, "salvage"),
        }
    }
}

/// 부품 판매 상태
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PartStatus {
    /// 판매 가능
    #[default]
    Available,
    /// 판매 완료
    Sold,
    /// 예약됨
    Reserved,
}

impl PartStatus {
    /// 문자열에서 판매 상태를 파싱합니다 (대소문자 구분 없음).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "available" | "avail" => Some(Self::Available),
            "sold" => Some(Self::Sold),
            "reserved" | "hold" => Some(Self::Reserved),
            _ => None,
        }
    }

    /// 전체 상태 목록
    pub const ALL: [PartStatus; 3] = [Self::Available, Self::Sold, Self::Reserved];
}

impl fmt::Display for PartStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::Sold => write!(f, "sold"),
            Self::Reserved => write!(f, "reserved"),
        }
    }
}

/// 부품 레코드 출처
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartSource {
    /// 부품 카탈로그에서 생성
    Catalog,
    /// 필수 부품 목록에서 생성
    Essential,
    /// 차체 유형별 추가 부품
    BodyType,
    /// 운영자가 직접 추가
    Manual,
}

impl fmt::Display for PartSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalog => write!(f, "catalog"),
            Self::Essential => write!(f, "essential"),
            Self::BodyType => write!(f, "body_type"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

/// 차체 유형
///
/// 부품 생성기가 차체별 추가 부품을 고를 때 사용합니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyType {
    /// 승용차
    Car,
    /// 트럭/픽업
    Truck,
    /// SUV
    Suv,
    /// 밴
    Van,
    /// 알 수 없음
    #[default]
    Unknown,
}

impl BodyType {
    /// 자유 형식 문자열에서 차체 유형을 추정합니다.
    ///
    /// 외부 조회 서비스의 `Vehicle Type` 값("PASSENGER CAR",
    /// "MULTIPURPOSE PASSENGER VEHICLE (MPV)" 등)을 그대로 받을 수 있습니다.
    /// 트럭 키워드를 가장 먼저 검사합니다.
    pub fn from_str_loose(s: &str) -> Self {
        let upper = s.trim().to_uppercase();
        if upper.is_empty() {
            return Self::Unknown;
        }
        if upper.contains("TRUCK") || upper.contains("PICKUP") {
            Self::Truck
        } else if upper.contains("SUV")
            || upper.contains("SPORT UTILITY")
            || upper.contains("MPV")
            || upper.contains("MULTIPURPOSE")
        {
            Self::Suv
        } else if upper.contains("VAN") {
            Self::Van
        } else if upper.contains("CAR")
            || upper.contains("SEDAN")
            || upper.contains("COUPE")
            || upper.contains("HATCHBACK")
            || upper.contains("PASSENGER")
        {
            Self::Car
        } else {
            Self::Unknown
        }
    }
}

impl fmt::Display for BodyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Car => write!(f, "CAR"),
            Self::Truck => write!(f, "TRUCK"),
            Self::Suv => write!(f, "SUV"),
            Self::Van => write!(f, "VAN"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// 부품 레코드
///
/// 상위 [`VehicleRecord`]가 소유하며, 상태 변경은 재고 저장소를 통해서만 일어납니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartRecord {
    /// 부품 ID (차량 내에서 고유)
    pub id: String,
    /// 부품명
    pub name: String,
    /// 가격
    pub price: Decimal,
    /// 부품 상태
    #[serde(default)]
    pub condition: PartCondition,
    /// 판매 상태
    #[serde(default)]
    pub status: PartStatus,
    /// 카테고리
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// 설명
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// 출처
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PartSource>,
}

impl PartRecord {
    /// 새 부품을 생성합니다. 상태는 `good` / `available` 입니다.
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            price,
            condition: PartCondition::Good,
            status: PartStatus::Available,
            category: None,
            description: None,
            source: None,
        }
    }

    /// 출처를 지정합니다.
    pub fn with_source(mut self, source: PartSource) -> Self {
        self.source = Some(source);
        self
    }

    /// 카테고리를 지정합니다.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// 설명을 지정합니다.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// 이름이 같은 부품인지 확인합니다 (대소문자 구분 없음).
    pub fn has_name(&self, name: &str) -> bool {
        fold_case(&self.name) == fold_case(name)
    }
}

impl fmt::Display for PartRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - ${} [{}]", self.name, self.price, self.status)
    }
}

/// 첨부 파일 레코드
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentRecord {
    /// 첨부 ID (차량 내에서 고유)
    pub id: String,
    /// 원본 파일명
    pub file_name: String,
    /// MIME 타입
    pub mime_type: String,
    /// 원본 크기 (바이트)
    pub size: u64,
    /// `data:<mime>;base64,...` 형식의 인코딩된 내용
    pub content: String,
    /// 업로드 시각
    pub uploaded_at: DateTime<Utc>,
}

/// 차량 레코드
///
/// 재고 저장소가 독점적으로 소유합니다. 명시적 삭제 시 부품/첨부와 함께 제거됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRecord {
    /// 차량 ID (저장소 내에서 고유)
    pub id: String,
    /// VIN
    pub vin: Vin,
    /// 제조사
    pub make: String,
    /// 모델
    pub model: String,
    /// 연식
    pub year: i32,
    /// 차량 가격
    pub price: Decimal,
    /// 보관 위치
    pub location: String,
    /// 색상
    #[serde(default)]
    pub color: String,
    /// 엔진
    #[serde(default)]
    pub engine: String,
    /// 트림
    #[serde(default)]
    pub trim: String,
    /// 부품 목록 (순서 유지)
    #[serde(default)]
    pub parts: Vec<PartRecord>,
    /// 첨부 파일 목록 (순서 유지)
    #[serde(default)]
    pub attachments: Vec<AttachmentRecord>,
    /// 대표 사진 (data URL)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    /// 등록 시각
    pub created_at: DateTime<Utc>,
}

impl VehicleRecord {
    /// 카드 제목 (`2020 NISSAN ALTIMA`)
    pub fn title(&self) -> String {
        format!("{} {} {}", self.year, self.make, self.model)
    }

    /// ID로 부품을 찾습니다.
    pub fn find_part(&self, part_id: &str) -> Option<&PartRecord> {
        self.parts.iter().find(|p| p.id == part_id)
    }

    /// ID로 부품을 찾아 가변 참조를 반환합니다.
    pub fn find_part_mut(&mut self, part_id: &str) -> Option<&mut PartRecord> {
        self.parts.iter_mut().find(|p| p.id == part_id)
    }

    /// 부품 가격 합계
    pub fn parts_total(&self) -> Decimal {
        self.parts.iter().map(|p| p.price).sum()
    }

    /// 특정 판매 상태의 부품 수
    pub fn count_parts(&self, status: PartStatus) -> usize {
        self.parts.iter().filter(|p| p.status == status).count()
    }
}

impl fmt::Display for VehicleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (vin={} parts={} price=${})",
            self.title(),
            self.vin,
            self.parts.len(),
            self.price,
        )
    }
}

/// 신규 차량 입력
///
/// 폼/CLI가 채워서 재고 저장소에 넘기는 값입니다. 필수 필드(VIN, 제조사, 모델,
/// 연식, 가격) 검증은 저장소의 `add`에서 수행합니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewVehicle {
    pub vin: String,
    pub make: String,
    pub model: String,
    pub year: Option<i32>,
    pub price: Option<Decimal>,
    pub location: String,
    pub color: String,
    pub engine: String,
    pub trim: String,
    pub parts: Vec<PartRecord>,
    pub attachments: Vec<AttachmentRecord>,
    pub photo: Option<String>,
}

/// 부품 카탈로그 엔트리
///
/// 카탈로그는 부품명 → 엔트리 맵으로 저장되며, 차량과 독립적으로 영속화됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartsCatalogEntry {
    /// 카테고리 (Powertrain, Electrical 등)
    pub category: String,
    /// 기본 가격
    pub default_price: Decimal,
    /// 호환 제조사 (`"ALL"` 은 전체)
    pub compatible_makes: BTreeSet<String>,
    /// 설명
    #[serde(default)]
    pub description: String,
}

impl PartsCatalogEntry {
    /// 주어진 제조사와 호환되는지 확인합니다 (와일드카드 포함, 대소문자 구분 없음).
    pub fn is_compatible_with(&self, make: &str) -> bool {
        let make = fold_case(make);
        let wildcard = fold_case(CATALOG_WILDCARD);
        self.compatible_makes.iter().any(|m| {
            let m = fold_case(m);
            m == wildcard || m == make
        })
    }
}

/// VIN 디코딩 결과
///
/// 디코더(또는 원격 조회)가 생성하고 부품 생성기가 즉시 소비합니다. 따로 저장하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedVehicleAttributes {
    pub make: String,
    pub model: String,
    pub year: i32,
    /// VIN에는 색상 정보가 없으므로 지역 디코더는 `None` 을 반환합니다.
    pub color: Option<String>,
    pub engine: String,
    pub trim: String,
    pub body_type: BodyType,
}

impl fmt::Display for DecodedVehicleAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ({}, engine={}, trim={})",
            self.year, self.make, self.model, self.body_type, self.engine, self.trim,
        )
    }
}
