//! 부품 카탈로그
//!
//! 부품명 → [`PartsCatalogEntry`] 맵입니다. 차량 재고와 별도의 키로 영속화되며,
//! 저장된 문서가 없으면 기본 카탈로그를 한 번 기록합니다.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use tracing::{debug, info};

use junkyard_core::error::{StorageError, ValidationError};
use junkyard_core::types::{CATALOG_WILDCARD, PartsCatalogEntry};

use crate::error::InventoryError;
use crate::storage::KeyValueStorage;

/// 부품 카탈로그
#[derive(Debug, Clone, PartialEq)]
pub struct PartsCatalog {
    entries: BTreeMap<String, PartsCatalogEntry>,
}

fn entry(category: &str, price: i64, makes: &[&str], description: &str) -> PartsCatalogEntry {
    PartsCatalogEntry {
        category: category.to_owned(),
        default_price: Decimal::from(price),
        compatible_makes: makes.iter().map(|m| (*m).to_owned()).collect::<BTreeSet<_>>(),
        description: description.to_owned(),
    }
}

impl PartsCatalog {
    /// 빈 카탈로그
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// 기본 카탈로그
    pub fn default_seed() -> Self {
        let all = &[CATALOG_WILDCARD];
        let entries = [
            ("engine", entry("Powertrain", 500, all, "Complete engine assembly")),
            ("transmission", entry("Powertrain", 300, all, "Transmission assembly")),
            (
                "catalytic converter",
                entry("Exhaust", 150, all, "Emissions catalytic converter"),
            ),
            ("radiator", entry("Cooling", 90, all, "Engine radiator")),
            (
                "headlight assembly",
                entry("Lighting", 75, all, "Front headlight assembly"),
            ),
            ("starter motor", entry("Electrical", 85, all, "Engine starter motor")),
            (
                "CVT transmission",
                entry("Powertrain", 450, &["NISSAN"], "Continuously variable transmission"),
            ),
            (
                "transfer case",
                entry(
                    "Drivetrain",
                    350,
                    &["FORD", "CHEVROLET", "RAM", "DODGE", "TOYOTA"],
                    "4WD transfer case",
                ),
            ),
            (
                "infotainment head unit",
                entry(
                    "Electronics",
                    200,
                    &["TOYOTA", "HONDA", "HYUNDAI", "KIA"],
                    "Factory infotainment head unit",
                ),
            ),
            (
                "turbocharger",
                entry(
                    "Powertrain",
                    400,
                    &["VOLKSWAGEN", "AUDI", "BMW", "SUBARU"],
                    "Factory turbocharger",
                ),
            ),
        ];

        Self {
            entries: entries
                .into_iter()
                .map(|(name, e)| (name.to_owned(), e))
                .collect(),
        }
    }

    /// 저장소에서 카탈로그를 읽습니다.
    ///
    /// 키가 없으면 기본 카탈로그를 저장하고 반환합니다. 문서가 손상되었으면
    /// [`StorageError::Corrupt`]를 반환합니다.
    pub fn load_or_seed<S: KeyValueStorage + ?Sized>(
        storage: &S,
        key: &str,
    ) -> Result<Self, InventoryError> {
        match storage.get(key)? {
            Some(raw) => {
                let entries: BTreeMap<String, PartsCatalogEntry> = serde_json::from_str(&raw)
                    .map_err(|e| StorageError::Corrupt {
                        key: key.to_owned(),
                        reason: e.to_string(),
                    })?;
                debug!(key, entries = entries.len(), "parts catalog loaded");
                Ok(Self { entries })
            }
            None => {
                let catalog = Self::default_seed();
                catalog.save(storage, key)?;
                info!(key, entries = catalog.len(), "parts catalog seeded");
                Ok(catalog)
            }
        }
    }

    /// 카탈로그 전체를 저장합니다.
    pub fn save<S: KeyValueStorage + ?Sized>(
        &self,
        storage: &S,
        key: &str,
    ) -> Result<(), InventoryError> {
        let json = serde_json::to_string(&self.entries).map_err(|e| StorageError::Write {
            key: key.to_owned(),
            reason: e.to_string(),
        })?;
        storage.set(key, &json)?;
        Ok(())
    }

    /// 제조사와 호환되는 엔트리를 이름순으로 반환합니다.
    pub fn entries_for_make<'a>(
        &'a self,
        make: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a PartsCatalogEntry)> + 'a {
        self.entries
            .iter()
            .filter(move |(_, e)| e.is_compatible_with(make))
            .map(|(name, e)| (name.as_str(), e))
    }

    /// 엔트리를 추가(또는 교체)하고 저장합니다.
    ///
    /// 제조사 목록은 대문자로 정규화됩니다.
    pub fn insert<S: KeyValueStorage + ?Sized>(
        &mut self,
        storage: &S,
        key: &str,
        name: &str,
        mut entry: PartsCatalogEntry,
    ) -> Result<(), InventoryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField {
                field: "name".to_owned(),
            }
            .into());
        }
        if entry.default_price.is_sign_negative() {
            return Err(ValidationError::InvalidField {
                field: "default_price".to_owned(),
                reason: "must not be negative".to_owned(),
            }
            .into());
        }
        entry.compatible_makes = entry
            .compatible_makes
            .iter()
            .map(|m| m.trim().to_uppercase())
            .filter(|m| !m.is_empty())
            .collect();
        if entry.compatible_makes.is_empty() {
            return Err(ValidationError::MissingField {
                field: "compatible_makes".to_owned(),
            }
            .into());
        }

        let replaced = self.entries.insert(name.to_owned(), entry).is_some();
        self.save(storage, key)?;
        info!(name, replaced, "catalog entry saved");
        Ok(())
    }

    /// 이름으로 엔트리를 찾습니다.
    pub fn get(&self, name: &str) -> Option<&PartsCatalogEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 전체 엔트리 (이름순)
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PartsCatalogEntry)> {
        self.entries.iter().map(|(name, e)| (name.as_str(), e))
    }
}

impl Default for PartsCatalog {
    fn default() -> Self {
        Self::default_seed()
    }
}
