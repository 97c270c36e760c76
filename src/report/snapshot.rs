use crate::model::{CarModel, SnapshotError, SweepResult};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const EXHIBITION_TYPE: &str = "특별기획전";

/// Condensed vehicle entry as written to the snapshot file. Raw
/// upstream text is carried through; missing fields become empty
/// strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapshotRecord {
    pub color: String,
    pub interior: String,
    pub trim: String,
    pub price: String,
    pub discount: String,
    pub discount_rate: String,
    pub center: String,
    pub production_date: String,
}

/// One sweep's machine-readable export. Empty buckets are omitted, so
/// the region map's key set is exactly the non-empty (siDo, siGun) set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: String,
    pub exhibition_type: String,
    pub exhibition_no: String,
    pub model: String,
    pub model_code: String,
    pub total_count: usize,
    pub regions: BTreeMap<String, BTreeMap<String, Vec<SnapshotRecord>>>,
}

impl Snapshot {
    pub fn from_sweep(result: &SweepResult, model: CarModel, exhibition_no: &str) -> Self {
        let mut regions: BTreeMap<String, BTreeMap<String, Vec<SnapshotRecord>>> = BTreeMap::new();
        for (sido, sigun, cars) in result.non_empty_buckets() {
            let records = cars
                .iter()
                .map(|car| SnapshotRecord {
                    color: car.exterior_color_name.clone().unwrap_or_default(),
                    interior: car.interior_color_name.clone().unwrap_or_default(),
                    trim: car.car_trim_name.clone().unwrap_or_default(),
                    price: car.final_amount.clone().unwrap_or_default(),
                    discount: car.discount_price.clone().unwrap_or_default(),
                    discount_rate: car.discount_rate.clone().unwrap_or_default(),
                    center: car.delivery_center_name.clone().unwrap_or_default(),
                    production_date: car.prdn_dt.clone().unwrap_or_default(),
                })
                .collect();
            regions
                .entry(sido.to_string())
                .or_default()
                .insert(sigun.to_string(), records);
        }

        Self {
            timestamp: Local::now().to_rfc3339(),
            exhibition_type: EXHIBITION_TYPE.to_string(),
            exhibition_no: exhibition_no.to_string(),
            model: model.display_name().to_string(),
            model_code: model.car_code().to_string(),
            total_count: result.total_count(),
            regions,
        }
    }

    /// Vehicle count recomputed from the region map; matches
    /// `total_count` for any snapshot this crate wrote.
    pub fn vehicle_count(&self) -> usize {
        self.regions
            .values()
            .flat_map(|siguns| siguns.values())
            .map(|records| records.len())
            .sum()
    }

    /// `special_stock_{carCode}_{YYYYMMDD_HHMMSS}.json`
    pub fn default_filename(model: CarModel) -> String {
        format!(
            "special_stock_{}_{}.json",
            model.car_code(),
            Local::now().format("%Y%m%d_%H%M%S")
        )
    }

    /// Writes the snapshot as indented UTF-8 JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SidoStock, VehicleRecord};

    fn car(final_amount: &str, color: &str) -> VehicleRecord {
        VehicleRecord {
            final_amount: Some(final_amount.to_string()),
            exterior_color_name: Some(color.to_string()),
            ..Default::default()
        }
    }

    fn sample_result() -> SweepResult {
        let mut seoul = SidoStock::new("서울");
        seoul.push_bucket(
            "강남구",
            vec![car("15923000.0", "톰보이 카키"), car("16500000", "언블리치드 아이보리")],
        );
        let mut gyeongbuk = SidoStock::new("경북");
        gyeongbuk.push_bucket("포항시", vec![car("17000000", "아틀라스 화이트")]);
        gyeongbuk.push_bucket("경주시", Vec::new());
        let empty = SidoStock::new("세종");
        SweepResult {
            sidos: vec![seoul, gyeongbuk, empty],
        }
    }

    #[test]
    fn snapshot_omits_empty_buckets() {
        let result = sample_result();
        let snapshot = Snapshot::from_sweep(&result, CarModel::Casper2026, "E20260133");
        assert_eq!(snapshot.total_count, 3);
        assert_eq!(snapshot.vehicle_count(), 3);
        assert!(snapshot.regions.contains_key("서울"));
        assert!(!snapshot.regions.contains_key("세종"));
        assert!(!snapshot.regions["경북"].contains_key("경주시"));
        assert_eq!(snapshot.model_code, "AX06");
        assert_eq!(snapshot.exhibition_no, "E20260133");
    }

    #[test]
    fn snapshot_round_trips_through_a_file() {
        let result = sample_result();
        let snapshot = Snapshot::from_sweep(&result, CarModel::CasperElectric2026, "E20260133");

        let file = tempfile::NamedTempFile::new().unwrap();
        snapshot.save(file.path()).unwrap();
        let reloaded = Snapshot::load(file.path()).unwrap();

        assert_eq!(reloaded.total_count, result.total_count());
        assert_eq!(reloaded.vehicle_count(), snapshot.vehicle_count());
        let keys = |s: &Snapshot| -> Vec<(String, String)> {
            s.regions
                .iter()
                .flat_map(|(sido, siguns)| {
                    siguns
                        .keys()
                        .map(move |sigun| (sido.clone(), sigun.clone()))
                })
                .collect()
        };
        assert_eq!(keys(&reloaded), keys(&snapshot));
        // Korean text survives the file unescaped.
        let raw = std::fs::read_to_string(file.path()).unwrap();
        assert!(raw.contains("강남구"));
    }

    #[test]
    fn default_filename_embeds_model_code() {
        let name = Snapshot::default_filename(CarModel::CasperElectric);
        assert!(name.starts_with("special_stock_AX03_"));
        assert!(name.ends_with(".json"));
        // special_stock_AX03_YYYYMMDD_HHMMSS.json
        assert_eq!(name.len(), "special_stock_AX03_20260825_120000.json".len());
    }
}
