use crate::error::LoadError;
use crate::report::PageLayout;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Column names of the results sheet.
///
/// Stored as a JSON object; every key is optional:
/// ```json
/// {
///   "school_id": "INEP",
///   "school_name": "ESCOLA",
///   "edition": "EDIÇÃO",
///   "percentage": "PERCENTUAL ALFABETIZAÇÃO"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub school_id: String,
    pub school_name: String,
    pub edition: String,
    pub percentage: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        ColumnMap {
            school_id: "INEP".into(),
            school_name: "ESCOLA".into(),
            edition: "EDIÇÃO".into(),
            percentage: "PERCENTUAL ALFABETIZAÇÃO".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub organization: String,
    pub title: String,
    pub logo_path: PathBuf,
    /// Page geometry; omitted keys keep the A4 defaults.
    pub layout: PageLayout,
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            organization: "PREFEITURA MUNICIPAL DE MARACANAÚ - SECRETARIA DE EDUCAÇÃO".into(),
            title: "RANKING DO PERCENTUAL DE ALFABETIZAÇÃO - AMA / 1º ANO".into(),
            logo_path: PathBuf::from("img/logo.png"),
            layout: PageLayout::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub columns: ColumnMap,
    /// Column of the access-code sheet holding the school codes.
    pub access_column: AccessColumn,
    /// Administrator code that unlocks every school.
    pub master_code: Option<String>,
    pub report: ReportSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct AccessColumn(pub String);

impl Default for AccessColumn {
    fn default() -> Self {
        AccessColumn("INEP".into())
    }
}

impl Settings {
    /// Loads settings from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)?;
        let settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Loads `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, LoadError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Settings::default()),
        }
    }
}
