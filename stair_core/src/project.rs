//! # Stair Project Snapshots
//!
//! A [`StairProject`] freezes one calculation: the entered dimensions plus
//! the results computed at save time. Results are stored, not recomputed, so
//! a loaded project shows exactly what was saved.
//!
//! ## File Layout
//!
//! ```text
//! ProjectFile
//! ├── version: String (schema version)
//! └── projects: Vec<StairProject> (newest first)
//! ```
//!
//! Files written before the version field existed hold a bare array of
//! projects; [`decode_projects`] still reads them.
//!
//! ## Example
//!
//! ```rust
//! use chrono::Utc;
//! use stair_core::calculations::CalculationInput;
//! use stair_core::project::StairProject;
//!
//! let project = StairProject::snapshot(CalculationInput::default(), Utc::now());
//! assert_eq!(project.result().number_of_risers, 18);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::calculations::stair::{compute, CalculationInput, CalculationResult};
use crate::errors::{StairError, StairResult};

/// Current schema version for store files
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Unix timestamp of 2001-01-01T00:00:00Z, the epoch of numeric legacy dates.
const REFERENCE_DATE_UNIX_SECS: f64 = 978_307_200.0;

/// Immutable snapshot of one stair calculation.
///
/// JSON has no NaN or infinity; such measures are written as `null` and
/// read back as NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StairProject {
    id: Uuid,
    #[serde(deserialize_with = "deserialize_date")]
    date: DateTime<Utc>,
    #[serde(deserialize_with = "deserialize_measure")]
    total_height: f64,
    #[serde(deserialize_with = "deserialize_measure")]
    ideal_riser_height: f64,
    #[serde(deserialize_with = "deserialize_measure")]
    tread_depth: f64,
    include_landing: bool,
    #[serde(deserialize_with = "deserialize_measure")]
    landing_depth: f64,
    number_of_risers: u32,
    #[serde(deserialize_with = "deserialize_measure")]
    actual_riser_height: f64,
    #[serde(deserialize_with = "deserialize_measure")]
    total_run: f64,
}

impl StairProject {
    /// Run the calculator on `input` and freeze input and result together.
    pub fn snapshot(input: CalculationInput, date: DateTime<Utc>) -> Self {
        let result = compute(&input);
        StairProject::from_parts(input, result, date)
    }

    /// Freeze an already computed result.
    pub fn from_parts(input: CalculationInput, result: CalculationResult, date: DateTime<Utc>) -> Self {
        StairProject {
            id: Uuid::new_v4(),
            date,
            total_height: input.total_height,
            ideal_riser_height: input.ideal_riser_height,
            tread_depth: input.tread_depth,
            include_landing: input.include_landing,
            landing_depth: input.landing_depth,
            number_of_risers: result.number_of_risers,
            actual_riser_height: result.actual_riser_height,
            total_run: result.total_run,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Project date as entered by the user; may be backdated.
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn input(&self) -> CalculationInput {
        CalculationInput {
            total_height: self.total_height,
            ideal_riser_height: self.ideal_riser_height,
            tread_depth: self.tread_depth,
            include_landing: self.include_landing,
            landing_depth: self.landing_depth,
        }
    }

    /// Results as they were at save time.
    pub fn result(&self) -> CalculationResult {
        CalculationResult {
            number_of_risers: self.number_of_risers,
            actual_riser_height: self.actual_riser_height,
            total_run: self.total_run,
        }
    }
}

/// On-disk envelope for the project list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectFile {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Projects, newest first
    pub projects: Vec<StairProject>,
}

impl ProjectFile {
    pub fn new(projects: Vec<StairProject>) -> Self {
        ProjectFile {
            version: SCHEMA_VERSION.to_string(),
            projects,
        }
    }
}

/// Encode a project list as a versioned, pretty-printed JSON document.
pub fn encode_projects(projects: &[StairProject]) -> StairResult<String> {
    #[derive(Serialize)]
    struct Borrowed<'a> {
        version: &'a str,
        projects: &'a [StairProject],
    }

    serde_json::to_string_pretty(&Borrowed {
        version: SCHEMA_VERSION,
        projects,
    })
    .map_err(|e| StairError::Serialization {
        reason: e.to_string(),
    })
}

/// Decode a store document. `source` names the origin for error messages.
///
/// Accepts the versioned envelope and the legacy bare array. Blank content
/// decodes to an empty list.
pub fn decode_projects(contents: &str, source: &str) -> StairResult<Vec<StairProject>> {
    let trimmed = contents.trim_start();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed)
            .map_err(|e| StairError::deserialization(source, format!("Invalid legacy project list: {}", e)));
    }

    let file: ProjectFile = serde_json::from_str(trimmed)
        .map_err(|e| StairError::deserialization(source, format!("Invalid JSON: {}", e)))?;
    validate_version(&file.version)?;
    Ok(file.projects)
}

/// Validate that a file version is compatible with the current schema.
///
/// The major version must match and the file must not come from a newer
/// minor version.
pub fn validate_version(file_version: &str) -> StairResult<()> {
    let mismatch = || StairError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file_parts: Vec<u32> = file_version
        .split('.')
        .map(|p| p.parse())
        .collect::<Result<_, _>>()
        .map_err(|_| mismatch())?;
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    match (file_parts.first(), current_parts.first()) {
        (Some(file_major), Some(current_major)) if file_major == current_major => {}
        _ => return Err(mismatch()),
    }

    if let (Some(file_minor), Some(current_minor)) = (file_parts.get(1), current_parts.get(1)) {
        if file_minor > current_minor {
            return Err(mismatch());
        }
    }

    Ok(())
}

fn deserialize_measure<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredDate {
    Rfc3339(DateTime<Utc>),
    ReferenceSeconds(f64),
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    match StoredDate::deserialize(deserializer)? {
        StoredDate::Rfc3339(date) => Ok(date),
        StoredDate::ReferenceSeconds(secs) => {
            let millis = ((REFERENCE_DATE_UNIX_SECS + secs) * 1000.0).round();
            if !millis.is_finite() {
                return Err(serde::de::Error::custom("date out of range"));
            }
            DateTime::<Utc>::from_timestamp_millis(millis as i64)
                .ok_or_else(|| serde::de::Error::custom("date out of range"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> StairProject {
        let date = Utc.with_ymd_and_hms(2025, 12, 19, 10, 30, 0).unwrap();
        StairProject::snapshot(CalculationInput::default(), date)
    }

    #[test]
    fn test_snapshot_freezes_results() {
        let project = sample();
        assert_eq!(project.result().number_of_risers, 18);
        assert_eq!(project.result().total_run, 442.0);
        assert_eq!(project.input(), CalculationInput::default());
    }

    #[test]
    fn test_loaded_results_are_not_recomputed() {
        let input = CalculationInput::default();
        let stale = CalculationResult {
            number_of_risers: 3,
            actual_riser_height: 100.0,
            total_run: 52.0,
        };
        let project = StairProject::from_parts(input, stale, Utc::now());

        let json = encode_projects(&[project]).unwrap();
        let loaded = decode_projects(&json, "test").unwrap();
        assert_eq!(loaded[0].result(), stale);
    }

    #[test]
    fn test_record_field_names() {
        let json = serde_json::to_string(&sample()).unwrap();
        for field in [
            "\"id\"",
            "\"date\"",
            "\"totalHeight\"",
            "\"idealRiserHeight\"",
            "\"treadDepth\"",
            "\"includeLanding\"",
            "\"landingDepth\"",
            "\"numberOfRisers\"",
            "\"actualRiserHeight\"",
            "\"totalRun\"",
        ] {
            assert!(json.contains(field), "missing {}", field);
        }
        assert!(json.contains("2025-12-19T10:30:00Z"));
    }

    #[test]
    fn test_envelope_roundtrip() {
        let projects = vec![sample(), sample()];
        let json = encode_projects(&projects).unwrap();
        assert!(json.contains(&format!("\"version\": \"{}\"", SCHEMA_VERSION)));

        let loaded = decode_projects(&json, "test").unwrap();
        assert_eq!(loaded, projects);
    }

    #[test]
    fn test_decode_legacy_array_with_reference_dates() {
        let legacy = r#"[{
            "id": "E621E1F8-C36C-495A-93FC-0C247A3E6E5F",
            "date": 787833000,
            "totalHeight": 300,
            "idealRiserHeight": 16.5,
            "treadDepth": 26,
            "includeLanding": true,
            "landingDepth": 120,
            "numberOfRisers": 18,
            "actualRiserHeight": 16.666666666666668,
            "totalRun": 562
        }]"#;

        let loaded = decode_projects(legacy, "legacy").unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].date(), Utc.with_ymd_and_hms(2025, 12, 19, 10, 30, 0).unwrap());
        assert_eq!(loaded[0].result().total_run, 562.0);
        assert!(loaded[0].input().include_landing);
    }

    #[test]
    fn test_non_finite_measures_decode_as_nan() {
        let input = CalculationInput {
            landing_depth: f64::NAN,
            tread_depth: f64::INFINITY,
            ..CalculationInput::default()
        };
        let project = StairProject::snapshot(input, Utc::now());

        let json = encode_projects(&[project.clone()]).unwrap();
        assert!(json.contains("\"landingDepth\": null"));

        let loaded = decode_projects(&json, "test").unwrap();
        assert_eq!(loaded[0].id(), project.id());
        assert!(loaded[0].input().landing_depth.is_nan());
        assert!(loaded[0].input().tread_depth.is_nan());
        assert!(loaded[0].result().total_run.is_nan());
        assert_eq!(loaded[0].input().total_height, 300.0);
    }

    #[test]
    fn test_decode_blank_is_empty() {
        assert!(decode_projects("", "blank").unwrap().is_empty());
        assert!(decode_projects("  \n", "blank").unwrap().is_empty());
    }

    #[test]
    fn test_decode_corrupt_content() {
        let err = decode_projects("{\"version\": \"1.0.0\", \"projects\": [", "bad.json").unwrap_err();
        assert_eq!(err.error_code(), "DESERIALIZATION_ERROR");
        assert!(err.to_string().contains("bad.json"));

        let err = decode_projects("[{\"id\": 5}]", "bad.json").unwrap_err();
        assert!(err.is_corrupt_data());
    }

    #[test]
    fn test_decode_rejects_newer_schema() {
        let doc = r#"{"version": "2.0.0", "projects": []}"#;
        let err = decode_projects(doc, "future.json").unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("1.0.7").is_ok());
        assert!(validate_version("1").is_ok());

        assert!(validate_version("0.9.0").is_err());
        assert!(validate_version("1.1.0").is_err());
        assert!(validate_version("2.0.0").is_err());
        assert!(validate_version("one").is_err());
        assert!(validate_version("").is_err());
    }
}
