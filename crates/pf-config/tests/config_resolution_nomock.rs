//! No-mock configuration resolution + validation tests.
//!
//! Covers:
//! - Resolution order (CLI > PATH_FLOW_CONFIG > PATH_FLOW_CONFIG_DIR)
//! - Loading real JSON files from a temp dir
//! - Semantic validation of loaded files

use pf_config::resolve::{ENV_CONFIG_DIR, ENV_CONFIG_PATH};
use pf_config::validate::{validate_flow_config, ValidationError};
use pf_config::{load_config, resolve_config, ConfigOptions, ConfigSource, FlowConfig};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use tempfile::TempDir;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

fn write_config(dir: &Path, name: &str, asset: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(
        &path,
        format!(
            r#"{{"schema_version": "1.0.0", "asset": "{}", "times": [0.0, 0.5, 1.0], "bins": [90, 100, 110]}}"#,
            asset
        ),
    )
    .expect("write config fixture");
    path
}

struct EnvGuard {
    vars: Vec<(&'static str, Option<String>)>,
}

impl EnvGuard {
    fn new(names: &[&'static str]) -> Self {
        let vars = names.iter().map(|n| (*n, env::var(n).ok())).collect();
        EnvGuard { vars }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (name, value) in &self.vars {
            match value {
                Some(v) => env::set_var(name, v),
                None => env::remove_var(name),
            }
        }
    }
}

#[test]
fn cli_path_beats_environment() {
    let _lock = env_lock();
    let _guard = EnvGuard::new(&[ENV_CONFIG_PATH, ENV_CONFIG_DIR]);
    let dir = TempDir::new().unwrap();
    let cli = write_config(dir.path(), "cli.json", "CLI");
    let env_file = write_config(dir.path(), "env.json", "ENV");
    env::set_var(ENV_CONFIG_PATH, &env_file);

    let resolved = resolve_config(Some(&cli));
    assert_eq!(resolved.source, ConfigSource::CliArgument);
    assert_eq!(resolved.path.as_deref(), Some(cli.as_path()));
}

#[test]
fn env_path_beats_env_dir() {
    let _lock = env_lock();
    let _guard = EnvGuard::new(&[ENV_CONFIG_PATH, ENV_CONFIG_DIR]);
    let dir = TempDir::new().unwrap();
    let env_file = write_config(dir.path(), "env.json", "ENV");
    write_config(dir.path(), "flow.json", "DIR");
    env::set_var(ENV_CONFIG_PATH, &env_file);
    env::set_var(ENV_CONFIG_DIR, dir.path());

    let resolved = load_config(&ConfigOptions::default()).unwrap();
    assert_eq!(resolved.source, ConfigSource::Environment);
    assert_eq!(resolved.config.asset, "ENV");
}

#[test]
fn env_dir_used_when_no_direct_path() {
    let _lock = env_lock();
    let _guard = EnvGuard::new(&[ENV_CONFIG_PATH, ENV_CONFIG_DIR]);
    env::remove_var(ENV_CONFIG_PATH);
    let dir = TempDir::new().unwrap();
    write_config(dir.path(), "flow.json", "DIR");
    env::set_var(ENV_CONFIG_DIR, dir.path());

    let resolved = load_config(&ConfigOptions::default()).unwrap();
    assert_eq!(resolved.config.asset, "DIR");
    assert_eq!(resolved.config.times, vec![0.0, 0.5, 1.0]);
    validate_flow_config(&resolved.config).unwrap();
}

#[test]
fn loaded_file_with_unsorted_bins_fails_validation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(
        &path,
        r#"{"schema_version": "1.0.0", "bins": [110, 100]}"#,
    )
    .unwrap();

    let config = FlowConfig::from_file(&path).unwrap();
    let err = validate_flow_config(&config).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidValue { .. }));
    assert_eq!(err.code(), 65);
}

#[test]
fn snapshot_hash_tracks_content() {
    let dir = TempDir::new().unwrap();
    let a = write_config(dir.path(), "a.json", "SPX");
    let b = write_config(dir.path(), "b.json", "NDX");

    let snap_a = load_config(&ConfigOptions {
        config_path: Some(a),
    })
    .unwrap()
    .snapshot;
    let snap_b = load_config(&ConfigOptions {
        config_path: Some(b),
    })
    .unwrap()
    .snapshot;

    assert_ne!(snap_a.config_hash, snap_b.config_hash);
    assert_eq!(snap_a.summary.edge_count, 3);
}
