use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// Current configuration schema version.
///
/// v1 was the flat first-release shape without per-module sheet types or
/// output paths (see [`ConfigV1`]). Migration is additive and forward-only.
pub const CURRENT_CONFIG_VERSION: u32 = 2;

/// Student identity recorded during first-run setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentInfo {
    pub name: String,
    pub id: String,
}

/// Kind of sheet a module produces.
///
/// The term appears in the document header and in generated file names.
/// `Custom` carries its free-text term on the owning [`Module`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SheetType {
    Practical,
    Lab,
    Worksheet,
    Tutorial,
    Assignment,
    Exercise,
    Custom,
}

impl SheetType {
    /// All selectable sheet types, in display order.
    pub const ALL: [SheetType; 7] = [
        SheetType::Practical,
        SheetType::Lab,
        SheetType::Worksheet,
        SheetType::Tutorial,
        SheetType::Assignment,
        SheetType::Exercise,
        SheetType::Custom,
    ];
}

impl Default for SheetType {
    fn default() -> Self {
        SheetType::Practical
    }
}

/// A taught module the student generates sheets for.
///
/// Module codes are unique within a configuration (case-insensitive);
/// uniqueness is enforced by [`ConfigStore`](crate::config::ConfigStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub name: String,
    pub code: String,

    #[serde(default)]
    pub sheet_type: SheetType,

    /// Free-text term used when `sheet_type` is `Custom`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_term: Option<String>,

    /// Dedicated output directory. `None` means the global output directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path: Option<Utf8PathBuf>,
}

impl Module {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            sheet_type: SheetType::default(),
            custom_term: None,
            output_path: None,
        }
    }

    /// Display/file term for this module's sheet type.
    ///
    /// A `Custom` type without a configured term falls back to "Sheet".
    pub fn term(&self) -> &str {
        match self.sheet_type {
            SheetType::Practical => "Practical",
            SheetType::Lab => "Lab",
            SheetType::Worksheet => "Worksheet",
            SheetType::Tutorial => "Tutorial",
            SheetType::Assignment => "Assignment",
            SheetType::Exercise => "Exercise",
            SheetType::Custom => self.custom_term.as_deref().unwrap_or("Sheet"),
        }
    }

    /// Case-insensitive code comparison used for uniqueness and lookup.
    pub fn code_matches(&self, code: &str) -> bool {
        self.code.eq_ignore_ascii_case(code)
    }
}

/// The persisted application configuration.
///
/// Loaded from `config.json` on startup, saved after every mutation. The
/// module list is insertion-ordered; that order is meaningful for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub version: u32,
    pub student: StudentInfo,
    pub modules: Vec<Module>,
    pub global_output_dir: Utf8PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_path: Option<Utf8PathBuf>,
}

impl Configuration {
    /// Fresh configuration at the current schema version.
    pub fn new(student: StudentInfo, global_output_dir: Utf8PathBuf) -> Self {
        Self {
            version: CURRENT_CONFIG_VERSION,
            student,
            modules: Vec::new(),
            global_output_dir,
            logo_path: None,
        }
    }

    pub fn find_module(&self, code: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.code_matches(code))
    }
}

/// First-release (v1) configuration shape, kept only for migration.
///
/// Flat student fields, modules without sheet types or output paths, and no
/// schema version field.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigV1 {
    #[serde(default)]
    pub student_name: String,

    #[serde(default)]
    pub student_id: String,

    #[serde(default)]
    pub modules: Vec<ModuleV1>,

    #[serde(default)]
    pub global_output_path: Option<Utf8PathBuf>,
}

/// v1 module entry.
///
/// Later v1 builds added per-module fields to the flat format: a sheet type
/// spelled as a display string ("Practical", "Lab", ...), a free-text
/// `custom_sheet_type`, and a dedicated `output_path`. All are optional so
/// the earliest files still parse, but when present they must survive
/// migration.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleV1 {
    pub name: String,
    pub code: String,

    #[serde(default)]
    pub sheet_type: Option<String>,

    #[serde(default)]
    pub custom_sheet_type: Option<String>,

    #[serde(default)]
    pub output_path: Option<Utf8PathBuf>,
}

/// A configuration file at any schema version this build can read.
#[derive(Debug, Clone)]
pub enum VersionedConfig {
    V1(ConfigV1),
    V2(Configuration),
}

impl VersionedConfig {
    /// Classify and deserialize raw JSON into its schema version.
    ///
    /// A missing or non-integer `version` field means v1: the earliest
    /// files wrote no version at all, and later flat-format files wrote a
    /// dotted string ("2.0.0"). Only the current nested format writes an
    /// integer.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let version = value.get("version").and_then(|v| v.as_u64()).unwrap_or(1);

        if version >= CURRENT_CONFIG_VERSION as u64 {
            Ok(VersionedConfig::V2(serde_json::from_value(value)?))
        } else {
            Ok(VersionedConfig::V1(serde_json::from_value(value)?))
        }
    }

    /// Apply the migration chain up to the current version.
    ///
    /// Each step only adds fields with safe defaults; applying the chain to
    /// an already-current configuration returns it unchanged.
    pub fn migrate(self, default_output_dir: &Utf8Path) -> Configuration {
        match self {
            VersionedConfig::V2(config) => config,
            VersionedConfig::V1(v1) => migrate_v1(v1, default_output_dir),
        }
    }

    pub fn is_current(&self) -> bool {
        matches!(self, VersionedConfig::V2(_))
    }
}

/// v1 -> v2: nest student fields, carry per-module fields where the flat
/// format had them, and fill in the global output directory.
fn migrate_v1(v1: ConfigV1, default_output_dir: &Utf8Path) -> Configuration {
    let modules = v1
        .modules
        .into_iter()
        .map(|m| {
            let (sheet_type, custom_term) = legacy_sheet_type(m.sheet_type, m.custom_sheet_type);
            Module {
                name: m.name,
                code: m.code,
                sheet_type,
                custom_term,
                output_path: m.output_path,
            }
        })
        .collect();

    Configuration {
        version: CURRENT_CONFIG_VERSION,
        student: StudentInfo {
            name: v1.student_name,
            id: v1.student_id,
        },
        modules,
        global_output_dir: v1
            .global_output_path
            .unwrap_or_else(|| default_output_dir.to_path_buf()),
        logo_path: None,
    }
}

/// Map a v1 sheet type string onto [`SheetType`].
///
/// A missing string means the default. An unrecognized string is kept as a
/// custom term rather than discarded.
fn legacy_sheet_type(
    raw: Option<String>,
    custom: Option<String>,
) -> (SheetType, Option<String>) {
    match raw.as_deref() {
        None | Some("Practical") => (SheetType::Practical, None),
        Some("Lab") => (SheetType::Lab, None),
        Some("Worksheet") => (SheetType::Worksheet, None),
        Some("Tutorial") => (SheetType::Tutorial, None),
        Some("Assignment") => (SheetType::Assignment, None),
        Some("Exercise") => (SheetType::Exercise, None),
        Some("Custom") => (SheetType::Custom, custom),
        Some(other) => (SheetType::Custom, Some(other.to_string())),
    }
}
