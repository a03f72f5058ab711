//! Integration tests for ConfigStore and configuration file handling
//!
//! These tests verify:
//! - Configuration loading and saving
//! - Default configuration generation on first run
//! - Legacy configuration migration
//! - Module bookkeeping persistence
//! - Integration with StateManager

use camino::Utf8PathBuf;
use labsheetgen::models::{Module, SheetType, StudentInfo, CURRENT_CONFIG_VERSION};
use labsheetgen::{ConfigError, ConfigStore};
use std::fs;
use tempfile::TempDir;

fn create_test_store() -> (ConfigStore, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    let store = ConfigStore::with_output_dir(root.join("config"), root.join("sheets")).unwrap();
    (store, temp_dir)
}

fn sample_student() -> StudentInfo {
    StudentInfo {
        name: "Jane Doe".to_string(),
        id: "IT2134567".to_string(),
    }
}

#[test]
fn test_first_run_yields_defaults_without_creating_file() {
    let (store, _temp_dir) = create_test_store();

    assert!(store.is_first_run());

    let config = store.load().unwrap();
    assert_eq!(config.version, CURRENT_CONFIG_VERSION);
    assert!(config.modules.is_empty());

    // Loading defaults must not write anything
    assert!(store.is_first_run());
}

#[test]
fn test_save_and_load_round_trip() {
    let (store, _temp_dir) = create_test_store();

    let mut config = store.load().unwrap();
    config.student = sample_student();
    config.modules.push(Module::new("Software Engineering", "SE2052"));
    store.save(&config).unwrap();

    assert!(!store.is_first_run());

    let loaded = store.load().unwrap();
    assert_eq!(loaded.student.name, "Jane Doe");
    assert_eq!(loaded.modules.len(), 1);
    assert_eq!(loaded.modules[0].code, "SE2052");
}

#[test]
fn test_add_module_persists() {
    let (store, _temp_dir) = create_test_store();

    let mut config = store.load().unwrap();
    store
        .add_module(&mut config, Module::new("Software Engineering", "SE2052"))
        .unwrap();

    let reloaded = store.load().unwrap();
    assert_eq!(reloaded.modules.len(), 1);
}

#[test]
fn test_duplicate_module_code_is_rejected_case_insensitively() {
    let (store, _temp_dir) = create_test_store();

    let mut config = store.load().unwrap();
    store
        .add_module(&mut config, Module::new("Software Engineering", "SE2052"))
        .unwrap();

    let result = store.add_module(&mut config, Module::new("Something Else", "se2052"));
    assert!(matches!(result, Err(ConfigError::DuplicateCode(_))));

    // The failed add must not leave a partial entry behind
    assert_eq!(store.load().unwrap().modules.len(), 1);
}

#[test]
fn test_update_and_remove_module() {
    let (store, _temp_dir) = create_test_store();

    let mut config = store.load().unwrap();
    store
        .add_module(&mut config, Module::new("Software Engineering", "SE2052"))
        .unwrap();

    let mut updated = Module::new("Software Engineering II", "SE2052");
    updated.sheet_type = SheetType::Tutorial;
    store.update_module(&mut config, "SE2052", updated).unwrap();

    let reloaded = store.load().unwrap();
    assert_eq!(reloaded.modules[0].name, "Software Engineering II");
    assert_eq!(reloaded.modules[0].sheet_type, SheetType::Tutorial);

    store.remove_module(&mut config, "SE2052").unwrap();
    assert!(store.load().unwrap().modules.is_empty());

    let missing = store.remove_module(&mut config, "SE2052");
    assert!(matches!(missing, Err(ConfigError::NotFound(_))));
}

#[test]
fn test_corrupt_file_surfaces_error() {
    let (store, _temp_dir) = create_test_store();

    fs::write(store.config_file(), "{not json at all").unwrap();

    let result = store.load();
    assert!(matches!(result, Err(ConfigError::Corrupt { .. })));
}

#[test]
fn test_legacy_config_migration_is_persisted() {
    let (store, _temp_dir) = create_test_store();

    // Version 1 schema: flat student fields, no version marker
    let legacy = r#"{
        "student_name": "Jane Doe",
        "student_id": "IT2134567",
        "modules": [
            {"name": "Software Engineering", "code": "SE2052"}
        ]
    }"#;
    fs::write(store.config_file(), legacy).unwrap();

    let config = store.load().unwrap();
    assert_eq!(config.version, CURRENT_CONFIG_VERSION);
    assert_eq!(config.student.name, "Jane Doe");
    assert_eq!(config.modules.len(), 1);
    assert_eq!(config.modules[0].sheet_type, SheetType::Practical);

    // The upgraded file should be on disk, so a second load does not migrate
    let raw = fs::read_to_string(store.config_file()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        value["version"],
        serde_json::json!(CURRENT_CONFIG_VERSION)
    );
}

#[test]
fn test_flat_format_with_string_version_migrates_losslessly() {
    let (store, _temp_dir) = create_test_store();

    // Late flat-format files carry a dotted string version and per-module
    // sheet types and output paths; none of that may be dropped
    let legacy = r#"{
        "version": "2.0.0",
        "student_name": "Jane Doe",
        "student_id": "IT2134567",
        "modules": [
            {
                "name": "Software Engineering",
                "code": "SE2052",
                "sheet_type": "Lab",
                "custom_sheet_type": null,
                "output_path": "/srv/se2052"
            }
        ],
        "global_output_path": "/docs/LabSheets"
    }"#;
    fs::write(store.config_file(), legacy).unwrap();

    let config = store.load().unwrap();
    assert_eq!(config.version, CURRENT_CONFIG_VERSION);

    let module = &config.modules[0];
    assert_eq!(module.sheet_type, SheetType::Lab);
    assert_eq!(
        module.output_path,
        Some(Utf8PathBuf::from("/srv/se2052"))
    );
    assert_eq!(config.global_output_dir, Utf8PathBuf::from("/docs/LabSheets"));

    // The persisted upgrade keeps them too
    let reloaded = store.load().unwrap();
    assert_eq!(reloaded.modules[0].sheet_type, SheetType::Lab);
    assert_eq!(
        reloaded.modules[0].output_path,
        Some(Utf8PathBuf::from("/srv/se2052"))
    );
}

#[test]
fn test_atomic_save_leaves_no_temp_file() {
    let (store, _temp_dir) = create_test_store();

    let config = store.load().unwrap();
    store.save(&config).unwrap();

    let temp_file = store.config_dir().join("config.json.tmp");
    assert!(!temp_file.exists());
    assert!(store.config_file().exists());
}

#[test]
fn test_resolve_output_path_prefers_module_override() {
    let (store, _temp_dir) = create_test_store();

    let config = store.load().unwrap();

    let mut module = Module::new("Software Engineering", "SE2052");
    assert_eq!(
        store.resolve_output_path(&config, &module),
        config.global_output_dir
    );

    module.output_path = Some(Utf8PathBuf::from("/srv/se2052"));
    assert_eq!(
        store.resolve_output_path(&config, &module),
        Utf8PathBuf::from("/srv/se2052")
    );
}

#[test]
fn test_config_directory_creation() {
    let temp_dir = TempDir::new().unwrap();
    let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    let config_dir = root.join("deeply").join("nested");

    assert!(!config_dir.exists());

    let _store = ConfigStore::with_output_dir(&config_dir, root.join("sheets")).unwrap();

    assert!(config_dir.exists());
}

#[test]
fn test_config_integration_with_state() {
    use labsheetgen::StateManager;
    use std::sync::Arc;

    let (store, _temp_dir) = create_test_store();

    let mut config = store.load().unwrap();
    config.student = sample_student();
    store
        .add_module(&mut config, Module::new("Software Engineering", "SE2052"))
        .unwrap();

    let state = Arc::new(StateManager::new());
    let loaded = store.load().unwrap();
    state.load_from_config(&loaded);

    let snapshot = state.snapshot();
    assert!(snapshot.is_configured);
    assert_eq!(snapshot.student_name, "Jane Doe");
    assert_eq!(snapshot.module_count, 1);
}

#[test]
fn test_concurrent_config_access() {
    use std::sync::Arc;

    let (store, _temp_dir) = create_test_store();

    let mut config = store.load().unwrap();
    config.student = sample_student();
    store.save(&config).unwrap();

    let store = Arc::new(store);
    let mut handles = vec![];

    for _ in 0..10 {
        let store_clone = store.clone();
        let handle = std::thread::spawn(move || {
            let config = store_clone.load().unwrap();
            assert_eq!(config.student.name, "Jane Doe");
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.join().unwrap();
    }
}
