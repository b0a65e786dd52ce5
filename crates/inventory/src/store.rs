//! 재고 저장소
//!
//! [`InventoryStore`]는 차량 목록을 메모리에 보관하고, 모든 변경 직후 목록 전체를
//! 하나의 JSON 문서로 저장소에 기록합니다.
//!
//! # 영속화
//!
//! - 부분/증분 저장은 없습니다. 매번 전체 직렬화합니다.
//! - 저장 실패는 `error` 레벨로 기록하고 카운트만 올립니다. 작업 자체는 성공으로 취급되며
//!   메모리 상태가 영속 상태보다 앞서게 됩니다. 재시도는 없습니다.

use std::collections::HashSet;

use chrono::Utc;
use tracing::{debug, error, info};

use junkyard_core::config::{InventoryConfig, StorageConfig};
use junkyard_core::error::{StorageError, ValidationError};
use junkyard_core::types::{DEFAULT_LOCATION, NewVehicle, PartStatus, VehicleRecord, fold_case};
use junkyard_core::vin::Vin;

use crate::error::InventoryError;
use crate::storage::KeyValueStorage;

/// 연식 허용 범위
pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2100;

/// 저장소 동작 옵션
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// 재고 문서 키
    pub key: String,
    /// 중복 VIN 허용 여부
    pub allow_duplicate_vins: bool,
    /// 위치 미입력 시 기본값
    pub default_location: String,
}

impl StoreOptions {
    /// 설정 섹션에서 옵션을 만듭니다.
    pub fn from_config(storage: &StorageConfig, inventory: &InventoryConfig) -> Self {
        Self {
            key: storage.inventory_key.clone(),
            allow_duplicate_vins: inventory.allow_duplicate_vins,
            default_location: inventory.default_location.clone(),
        }
    }
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self::from_config(&StorageConfig::default(), &InventoryConfig::default())
    }
}

/// 차량 재고 저장소
pub struct InventoryStore<S> {
    storage: S,
    options: StoreOptions,
    vehicles: Vec<VehicleRecord>,
    persist_failures: usize,
}

impl<S: KeyValueStorage> InventoryStore<S> {
    /// 저장소에서 재고를 읽습니다. 문서가 없으면 빈 재고로 시작합니다.
    pub fn load(storage: S, options: StoreOptions) -> Result<Self, InventoryError> {
        let vehicles = match storage.get(&options.key)? {
            Some(raw) => serde_json::from_str::<Vec<VehicleRecord>>(&raw).map_err(|e| {
                StorageError::Corrupt {
                    key: options.key.clone(),
                    reason: e.to_string(),
                }
            })?,
            None => Vec::new(),
        };

        debug!(key = options.key.as_str(), vehicles = vehicles.len(), "inventory loaded");

        Ok(Self {
            storage,
            options,
            vehicles,
            persist_failures: 0,
        })
    }

    /// 차량을 등록합니다.
    ///
    /// 필수 필드(VIN, 제조사, 모델, 연식, 가격)가 없거나 VIN이 중복이면 상태를 바꾸지 않고
    /// 검증 에러를 반환합니다.
    pub fn add(&mut self, input: NewVehicle) -> Result<&VehicleRecord, InventoryError> {
        let record = self.validate(input)?;

        info!(
            id = record.id.as_str(),
            vin = %record.vin,
            title = %record.title(),
            parts = record.parts.len(),
            "vehicle added"
        );

        self.vehicles.push(record);
        self.persist();

        let index = self.vehicles.len() - 1;
        Ok(&self.vehicles[index])
    }

    fn validate(&self, input: NewVehicle) -> Result<VehicleRecord, ValidationError> {
        let NewVehicle {
            vin,
            make,
            model,
            year,
            price,
            location,
            color,
            engine,
            trim,
            mut parts,
            mut attachments,
            photo,
        } = input;

        if vin.trim().is_empty() {
            return Err(missing("vin"));
        }
        let vin = Vin::parse(&vin)?;

        let make = make.trim().to_owned();
        if make.is_empty() {
            return Err(missing("make"));
        }
        let model = model.trim().to_owned();
        if model.is_empty() {
            return Err(missing("model"));
        }

        let year = year.ok_or_else(|| missing("year"))?;
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(ValidationError::InvalidField {
                field: "year".to_owned(),
                reason: format!("must be between {MIN_YEAR} and {MAX_YEAR}"),
            });
        }

        let price = price.ok_or_else(|| missing("price"))?;
        if price.is_sign_negative() && !price.is_zero() {
            return Err(ValidationError::InvalidField {
                field: "price".to_owned(),
                reason: "must not be negative".to_owned(),
            });
        }

        if !self.options.allow_duplicate_vins && self.find_by_vin(&vin).is_some() {
            return Err(ValidationError::DuplicateVin {
                vin: vin.to_string(),
            });
        }

        let mut seen = HashSet::new();
        for part in &mut parts {
            if part.id.is_empty() || !seen.insert(part.id.clone()) {
                part.id = new_id();
                seen.insert(part.id.clone());
            }
        }
        let mut seen = HashSet::new();
        for attachment in &mut attachments {
            if attachment.id.is_empty() || !seen.insert(attachment.id.clone()) {
                attachment.id = new_id();
                seen.insert(attachment.id.clone());
            }
        }

        let location = match location.trim() {
            "" => self.options.default_location.clone(),
            other => other.to_owned(),
        };

        Ok(VehicleRecord {
            id: self.unused_vehicle_id(),
            vin,
            make,
            model,
            year,
            price,
            location,
            color: color.trim().to_owned(),
            engine: engine.trim().to_owned(),
            trim: trim.trim().to_owned(),
            parts,
            attachments,
            photo,
            created_at: Utc::now(),
        })
    }

    fn unused_vehicle_id(&self) -> String {
        loop {
            let id = new_id();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    /// 차량을 삭제합니다. 없는 ID면 아무것도 바꾸지 않고 저장도 하지 않습니다.
    pub fn delete(&mut self, id: &str) -> Option<VehicleRecord> {
        let index = self.vehicles.iter().position(|v| v.id == id)?;
        let removed = self.vehicles.remove(index);
        info!(id, vin = %removed.vin, "vehicle deleted");
        self.persist();
        Some(removed)
    }

    /// 부품 판매 상태를 변경합니다. 차량 또는 부품이 없으면 아무것도 하지 않고 `false`.
    pub fn update_part_status(&mut self, vehicle_id: &str, part_id: &str, status: PartStatus) -> bool {
        let Some(part) = self
            .vehicles
            .iter_mut()
            .find(|v| v.id == vehicle_id)
            .and_then(|v| v.find_part_mut(part_id))
        else {
            debug!(vehicle_id, part_id, "part status update ignored: no such part");
            return false;
        };

        let previous = part.status;
        part.status = status;
        info!(vehicle_id, part_id, from = %previous, to = %status, "part status updated");
        self.persist();
        true
    }

    /// 제조사, 모델, 위치, 부품명에 대한 대소문자 무시 부분 문자열 검색.
    /// 빈 검색어는 전체를 반환합니다.
    pub fn search(&self, term: &str) -> Vec<&VehicleRecord> {
        let term = fold_case(term);
        if term.is_empty() {
            return self.vehicles.iter().collect();
        }
        self.vehicles
            .iter()
            .filter(|v| {
                fold_case(&v.make).contains(&term)
                    || fold_case(&v.model).contains(&term)
                    || fold_case(&v.location).contains(&term)
                    || v.parts.iter().any(|p| fold_case(&p.name).contains(&term))
            })
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&VehicleRecord> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    /// VIN으로 차량을 찾습니다.
    pub fn find_by_vin(&self, vin: &Vin) -> Option<&VehicleRecord> {
        self.vehicles.iter().find(|v| &v.vin == vin)
    }

    /// 전체 차량 (등록 순)
    pub fn vehicles(&self) -> &[VehicleRecord] {
        &self.vehicles
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// 누적 저장 실패 횟수
    pub fn persist_failures(&self) -> usize {
        self.persist_failures
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&mut self) {
        let key = self.options.key.as_str();
        let result = serde_json::to_string(&self.vehicles)
            .map_err(|e| StorageError::Write {
                key: key.to_owned(),
                reason: e.to_string(),
            })
            .and_then(|json| self.storage.set(key, &json));

        match result {
            Ok(()) => debug!(key, vehicles = self.vehicles.len(), "inventory persisted"),
            Err(e) => {
                self.persist_failures += 1;
                error!(
                    key,
                    error = %e,
                    failures = self.persist_failures,
                    "failed to persist inventory; in-memory state is ahead of storage"
                );
            }
        }
    }
}

fn missing(field: &str) -> ValidationError {
    ValidationError::MissingField {
        field: field.to_owned(),
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
