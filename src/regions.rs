// Region directory: the two-level siDo/siGun geography plus upstream codes.
// The backing file is produced by the separate region-fetch step; this
// module only consumes it.
use crate::model::{ClientError, SweepError};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Read-only view of the administrative-region hierarchy.
pub trait RegionDirectory: Send + Sync {
    /// Whether the backing data has been populated at all.
    fn is_available(&self) -> bool;

    /// Top-level region names, in directory order.
    fn sido_names(&self) -> Vec<String>;

    /// Sub-region names for one siDo, in directory order.
    fn sigun_names(&self, sido: &str) -> Vec<String>;

    /// Resolves a name pair to the upstream's
    /// (deliveryAreaCode, deliveryLocalAreaCode) pair.
    fn resolve(&self, sido: &str, sigun: Option<&str>) -> Result<(String, String), ClientError>;
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigunEntry {
    pub name: String,
    pub local_area_code: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SidoEntry {
    pub name: String,
    pub area_code: String,
    /// Local-area code covering the whole siDo, used when searching the
    /// siDo without a siGun.
    pub local_area_code: String,
    #[serde(default)]
    pub siguns: Vec<SigunEntry>,
}

/// Directory backed by the JSON file the region-fetch step writes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JsonRegionDirectory {
    sidos: Vec<SidoEntry>,
}

impl JsonRegionDirectory {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SweepError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SweepError::PrerequisiteMissing(format!("{}: {}", path.display(), e))
        })?;
        let directory: Self = serde_json::from_str(&content).map_err(|e| {
            SweepError::PrerequisiteMissing(format!("{}: {}", path.display(), e))
        })?;
        if directory.sidos.is_empty() {
            return Err(SweepError::PrerequisiteMissing(format!(
                "{}: file holds no regions",
                path.display()
            )));
        }
        Ok(directory)
    }

    pub fn from_entries(sidos: Vec<SidoEntry>) -> Self {
        Self { sidos }
    }

    fn find(&self, sido: &str) -> Option<&SidoEntry> {
        self.sidos.iter().find(|s| s.name == sido)
    }
}

impl RegionDirectory for JsonRegionDirectory {
    fn is_available(&self) -> bool {
        !self.sidos.is_empty()
    }

    fn sido_names(&self) -> Vec<String> {
        self.sidos.iter().map(|s| s.name.clone()).collect()
    }

    fn sigun_names(&self, sido: &str) -> Vec<String> {
        self.find(sido)
            .map(|s| s.siguns.iter().map(|g| g.name.clone()).collect())
            .unwrap_or_default()
    }

    fn resolve(&self, sido: &str, sigun: Option<&str>) -> Result<(String, String), ClientError> {
        let entry = self
            .find(sido)
            .ok_or_else(|| ClientError::RegionNotFound(sido.to_string()))?;
        match sigun {
            Some(name) => {
                let sub = entry
                    .siguns
                    .iter()
                    .find(|g| g.name == name)
                    .ok_or_else(|| {
                        ClientError::RegionNotFound(format!("{} {}", sido, name))
                    })?;
                Ok((entry.area_code.clone(), sub.local_area_code.clone()))
            }
            None => Ok((entry.area_code.clone(), entry.local_area_code.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "sidos": [
            { "name": "서울", "areaCode": "A", "localAreaCode": "A0",
              "siguns": [
                  { "name": "강남구", "localAreaCode": "A1" },
                  { "name": "서초구", "localAreaCode": "A2" }
              ] },
            { "name": "세종", "areaCode": "S", "localAreaCode": "S0", "siguns": [] }
        ]
    }"#;

    #[test]
    fn parses_directory_file_and_resolves_codes() {
        let dir: JsonRegionDirectory = serde_json::from_str(SAMPLE).unwrap();
        assert!(dir.is_available());
        assert_eq!(dir.sido_names(), vec!["서울", "세종"]);
        assert_eq!(dir.sigun_names("서울"), vec!["강남구", "서초구"]);
        assert!(dir.sigun_names("세종").is_empty());

        assert_eq!(
            dir.resolve("서울", Some("강남구")).unwrap(),
            ("A".to_string(), "A1".to_string())
        );
        assert_eq!(
            dir.resolve("세종", None).unwrap(),
            ("S".to_string(), "S0".to_string())
        );
    }

    #[test]
    fn unknown_names_resolve_to_region_not_found() {
        let dir: JsonRegionDirectory = serde_json::from_str(SAMPLE).unwrap();
        assert!(matches!(
            dir.resolve("부산", None),
            Err(ClientError::RegionNotFound(_))
        ));
        assert!(matches!(
            dir.resolve("서울", Some("포항시")),
            Err(ClientError::RegionNotFound(_))
        ));
    }

    #[test]
    fn missing_or_empty_file_is_a_missing_prerequisite() {
        assert!(matches!(
            JsonRegionDirectory::load("definitely/not/there.json"),
            Err(SweepError::PrerequisiteMissing(_))
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "sidos": [] }}"#).unwrap();
        assert!(matches!(
            JsonRegionDirectory::load(file.path()),
            Err(SweepError::PrerequisiteMissing(_))
        ));
    }
}
