//! 차량 입력 드래프트
//!
//! 등록 전 차량 정보를 모아 두는 버퍼입니다. 부품 추가/삭제, 디코딩 결과 반영,
//! 추천 가격 채우기, 사진과 첨부 파일을 다룹니다. 필수 필드 검증은
//! [`InventoryStore::add`](crate::store::InventoryStore::add)에서 수행합니다.

use rust_decimal::Decimal;
use tracing::debug;

use junkyard_core::error::ValidationError;
use junkyard_core::types::{
    AttachmentRecord, DecodedVehicleAttributes, NewVehicle, PartRecord, PartSource,
};

use crate::catalog::PartsCatalog;
use crate::parts::{default_price, generate_parts, suggested_price};

/// 차량 입력 드래프트
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleDraft {
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

impl VehicleDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// 가격표의 기본 가격으로 부품을 추가합니다.
    pub fn add_common_part(&mut self, name: &str) -> Result<&PartRecord, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField {
                field: "part name".to_owned(),
            });
        }
        self.push_part(PartRecord::new(name, default_price(name)).with_source(PartSource::Manual))
    }

    /// 이름과 가격을 지정해 부품을 추가합니다. 둘 다 필수입니다.
    pub fn add_custom_part(
        &mut self,
        name: &str,
        price: Option<Decimal>,
    ) -> Result<&PartRecord, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField {
                field: "part name".to_owned(),
            });
        }
        let price = price.ok_or_else(|| ValidationError::MissingField {
            field: "part price".to_owned(),
        })?;
        if price.is_sign_negative() && !price.is_zero() {
            return Err(ValidationError::InvalidField {
                field: "part price".to_owned(),
                reason: "must not be negative".to_owned(),
            });
        }
        self.push_part(PartRecord::new(name, price).with_source(PartSource::Manual))
    }

    fn push_part(&mut self, part: PartRecord) -> Result<&PartRecord, ValidationError> {
        debug!(name = part.name.as_str(), price = %part.price, "draft part added");
        self.parts.push(part);
        let index = self.parts.len() - 1;
        Ok(&self.parts[index])
    }

    /// ID로 부품을 제거합니다.
    pub fn remove_part(&mut self, part_id: &str) -> Option<PartRecord> {
        let index = self.parts.iter().position(|p| p.id == part_id)?;
        Some(self.parts.remove(index))
    }

    /// 디코딩 결과로 차량 정보를 채우고 부품 목록을 다시 생성합니다.
    ///
    /// 기존 부품 목록은 교체됩니다.
    pub fn apply_decoded(&mut self, attrs: &DecodedVehicleAttributes, catalog: &PartsCatalog) {
        self.make = attrs.make.clone();
        self.model = attrs.model.clone();
        self.year = Some(attrs.year);
        if let Some(color) = &attrs.color {
            self.color = color.clone();
        }
        self.engine = attrs.engine.clone();
        self.trim = attrs.trim.clone();
        self.parts = generate_parts(catalog, &attrs.make, attrs.body_type);
        debug!(
            make = self.make.as_str(),
            model = self.model.as_str(),
            parts = self.parts.len(),
            "draft filled from decoded attributes"
        );
    }

    /// 현재 부품 합계
    pub fn parts_total(&self) -> Decimal {
        crate::parts::parts_total(&self.parts)
    }

    /// 추천 가격
    pub fn suggested_price(&self) -> Decimal {
        suggested_price(&self.parts)
    }

    /// 가격이 비어 있고 부품이 있을 때만 추천 가격을 채웁니다.
    /// 채운 값을 반환합니다.
    pub fn fill_suggested_price(&mut self) -> Option<Decimal> {
        if self.price.is_some() || self.parts.is_empty() {
            return None;
        }
        let suggested = self.suggested_price();
        self.price = Some(suggested);
        Some(suggested)
    }

    pub fn set_photo(&mut self, data_url: impl Into<String>) {
        self.photo = Some(data_url.into());
    }

    pub fn add_attachment(&mut self, attachment: AttachmentRecord) {
        self.attachments.push(attachment);
    }

    /// 드래프트를 초기 상태로 되돌립니다.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn into_new_vehicle(self) -> NewVehicle {
        NewVehicle {
            vin: self.vin,
            make: self.make,
            model: self.model,
            year: self.year,
            price: self.price,
            location: self.location,
            color: self.color,
            engine: self.engine,
            trim: self.trim,
            parts: self.parts,
            attachments: self.attachments,
            photo: self.photo,
        }
    }
}
