//! 재고 집계
//!
//! 차량 목록에서 매번 새로 계산하는 파생 값입니다. 따로 저장하지 않습니다.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use junkyard_core::types::{PartStatus, VehicleRecord};

/// 재고 요약
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_vehicles: usize,
    pub total_parts: usize,
    pub available_parts: usize,
    pub sold_parts: usize,
    pub reserved_parts: usize,
    /// 차량 가격 합계
    pub inventory_value: Decimal,
    /// 판매 가능 부품 가격 합계
    pub available_parts_value: Decimal,
    /// 판매 완료 부품 가격 합계
    pub sold_revenue: Decimal,
    /// 제조사별 차량 수
    pub makes: BTreeMap<String, usize>,
}

impl DashboardSummary {
    pub fn compute<'a, I>(vehicles: I) -> Self
    where
        I: IntoIterator<Item = &'a VehicleRecord>,
    {
        let mut summary = Self::default();
        for vehicle in vehicles {
            summary.total_vehicles += 1;
            summary.inventory_value += vehicle.price;
            *summary.makes.entry(vehicle.make.to_uppercase()).or_default() += 1;

            for part in &vehicle.parts {
                summary.total_parts += 1;
                match part.status {
                    PartStatus::Available => {
                        summary.available_parts += 1;
                        summary.available_parts_value += part.price;
                    }
                    PartStatus::Sold => {
                        summary.sold_parts += 1;
                        summary.sold_revenue += part.price;
                    }
                    PartStatus::Reserved => summary.reserved_parts += 1,
                }
            }
        }
        summary
    }
}
