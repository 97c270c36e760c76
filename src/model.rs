// Core structs: CarModel, VehicleRecord, SweepResult
use crate::utils::parse_amount;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

/// Fixed catalog of special-exhibition Casper models.
///
/// Closed set: the exhibition only ever lists these four trims, so the
/// catalog is an enum rather than anything data-driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarModel {
    Casper2026,
    CasperElectric2026,
    CasperNew,
    CasperElectric,
}

impl CarModel {
    pub const ALL: [CarModel; 4] = [
        CarModel::Casper2026,
        CarModel::CasperElectric2026,
        CarModel::CasperNew,
        CarModel::CasperElectric,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            CarModel::Casper2026 => "2026 캐스퍼",
            CarModel::CasperElectric2026 => "2026 캐스퍼 일렉트릭",
            CarModel::CasperNew => "더 뉴 캐스퍼",
            CarModel::CasperElectric => "캐스퍼 일렉트릭",
        }
    }

    pub fn car_code(self) -> &'static str {
        match self {
            CarModel::Casper2026 => "AX06",
            CarModel::CasperElectric2026 => "AX05",
            CarModel::CasperNew => "AX04",
            CarModel::CasperElectric => "AX03",
        }
    }

    /// Subsidy-region code; empty for the petrol trims.
    pub fn subsidy_region(self) -> &'static str {
        match self {
            CarModel::CasperElectric2026 | CarModel::CasperElectric => "2800",
            _ => "",
        }
    }

    /// Sale-price bounds as the upstream expects them: numeric text,
    /// empty string meaning "no bound".
    pub fn min_sale_price(self) -> &'static str {
        match self {
            CarModel::Casper2026 => "15923000",
            CarModel::CasperElectric2026 => "35877000",
            CarModel::CasperNew => "",
            CarModel::CasperElectric => "32060670",
        }
    }

    pub fn max_sale_price(self) -> &'static str {
        match self {
            CarModel::Casper2026 => "17875000",
            CarModel::CasperElectric2026 => "37306000",
            CarModel::CasperNew => "",
            CarModel::CasperElectric => "32060670",
        }
    }
}

/// One upstream inventory entry, passed through as-is.
///
/// Every field is optional: the upstream omits fields freely, and the
/// price fields arrive as numeric-like text ("15923000.0"). Use the
/// accessor methods instead of reading the raw fields.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct VehicleRecord {
    pub car_name: Option<String>,
    pub sale_model_name: Option<String>,
    pub car_trim_name: Option<String>,
    pub exterior_color_name: Option<String>,
    pub interior_color_name: Option<String>,
    #[serde(deserialize_with = "text_or_number")]
    pub car_price: Option<String>,
    #[serde(deserialize_with = "text_or_number")]
    pub discount_price: Option<String>,
    #[serde(deserialize_with = "text_or_number")]
    pub discount_rate: Option<String>,
    #[serde(deserialize_with = "text_or_number")]
    pub final_amount: Option<String>,
    pub delivery_center_name: Option<String>,
    pub prdn_dt: Option<String>,
    pub car_production_number: Option<String>,
}

impl VehicleRecord {
    pub fn exterior(&self) -> &str {
        self.exterior_color_name.as_deref().unwrap_or("N/A")
    }

    pub fn interior(&self) -> &str {
        self.interior_color_name.as_deref().unwrap_or("N/A")
    }

    pub fn trim(&self) -> &str {
        self.car_trim_name.as_deref().unwrap_or("N/A")
    }

    pub fn delivery_center(&self) -> &str {
        self.delivery_center_name.as_deref().unwrap_or("N/A")
    }

    pub fn discount_won(&self) -> i64 {
        parse_amount(self.discount_price.as_deref())
    }

    pub fn final_amount_won(&self) -> i64 {
        parse_amount(self.final_amount.as_deref())
    }
}

/// Accepts a JSON string or number and keeps it as text; the upstream
/// is not consistent about which one it sends for amounts.
fn text_or_number<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(de)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Accumulated result of one nationwide sweep for a single model.
///
/// Order follows the region directory's siDo order. Every visited siDo
/// gets an entry even when nothing was found; a bucket appears only when
/// its region returned at least one record. A siDo with exactly one
/// siGun keys its stock under that siGun's name; one with no siGun keys
/// it under its own name. Callers treat every bucket name uniformly.
#[derive(Debug, Clone, Default)]
pub struct SweepResult {
    pub sidos: Vec<SidoStock>,
}

#[derive(Debug, Clone)]
pub struct SidoStock {
    pub name: String,
    pub buckets: Vec<RegionBucket>,
}

#[derive(Debug, Clone)]
pub struct RegionBucket {
    pub name: String,
    pub cars: Vec<VehicleRecord>,
}

impl SidoStock {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            buckets: Vec::new(),
        }
    }

    pub fn push_bucket(&mut self, name: impl Into<String>, cars: Vec<VehicleRecord>) {
        self.buckets.push(RegionBucket {
            name: name.into(),
            cars,
        });
    }

    pub fn total(&self) -> usize {
        self.buckets.iter().map(|b| b.cars.len()).sum()
    }
}

impl SweepResult {
    pub fn total_count(&self) -> usize {
        self.sidos.iter().map(|s| s.total()).sum()
    }

    /// Number of distinct buckets holding at least one vehicle.
    pub fn stocked_bucket_count(&self) -> usize {
        self.sidos
            .iter()
            .flat_map(|s| &s.buckets)
            .filter(|b| !b.cars.is_empty())
            .count()
    }

    /// Flattened view of every non-empty bucket, in sweep order.
    pub fn non_empty_buckets(&self) -> Vec<(&str, &str, &[VehicleRecord])> {
        self.sidos
            .iter()
            .flat_map(|sido| {
                sido.buckets
                    .iter()
                    .filter(|b| !b.cars.is_empty())
                    .map(move |b| (sido.name.as_str(), b.name.as_str(), b.cars.as_slice()))
            })
            .collect()
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("unknown region {0:?}: populate the region directory first")]
    RegionNotFound(String),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("region directory not populated ({0}): run the region fetch step first")]
    PrerequisiteMissing(String),
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(final_amount: &str) -> VehicleRecord {
        VehicleRecord {
            final_amount: Some(final_amount.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn record_tolerates_text_and_numeric_amounts() {
        let from_text: VehicleRecord =
            serde_json::from_str(r#"{"finalAmount":"15923000.0","discountPrice":"500000"}"#)
                .unwrap();
        assert_eq!(from_text.final_amount_won(), 15923000);
        assert_eq!(from_text.discount_won(), 500000);

        let from_number: VehicleRecord =
            serde_json::from_str(r#"{"finalAmount":15923000,"discountRate":3.5}"#).unwrap();
        assert_eq!(from_number.final_amount_won(), 15923000);
        assert_eq!(from_number.discount_rate.as_deref(), Some("3.5"));
    }

    #[test]
    fn record_substitutes_placeholder_for_missing_fields() {
        let rec: VehicleRecord = serde_json::from_str(r#"{"carTrimName":"디 에센셜"}"#).unwrap();
        assert_eq!(rec.trim(), "디 에센셜");
        assert_eq!(rec.exterior(), "N/A");
        assert_eq!(rec.delivery_center(), "N/A");
        assert_eq!(rec.final_amount_won(), 0);
    }

    #[test]
    fn sweep_result_counts_only_non_empty_buckets() {
        let mut seoul = SidoStock::new("서울");
        seoul.push_bucket("강남구", vec![record("1000"), record("2000")]);
        let mut gyeongbuk = SidoStock::new("경북");
        gyeongbuk.push_bucket("포항시", vec![record("3000")]);
        let empty = SidoStock::new("세종");

        let result = SweepResult {
            sidos: vec![seoul, gyeongbuk, empty],
        };
        assert_eq!(result.total_count(), 3);
        assert_eq!(result.stocked_bucket_count(), 2);
        assert_eq!(result.non_empty_buckets().len(), 2);
    }
}
