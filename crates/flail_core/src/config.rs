//! Demo tunables loaded from JSON.
//!
//! The config file is optional: when it is missing the demo runs on the
//! built-in defaults below. When it is present it must be valid; a config
//! that parses but fails validation is rejected as a whole rather than
//! merged field-by-field, so a reload never leaves half-applied tunables.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DemoConfig {
    #[serde(default = "default_title")]
    pub window_title: String,
    /// Integer upscale factor from the 192x108 logical surface to the window.
    #[serde(default = "default_window_scale")]
    pub window_scale: u32,
    /// Chain length in logical pixels (flail orbit radius).
    #[serde(default = "default_chain_length")]
    pub chain_length: f32,
    /// Bearing of the flail's unrotated rest position, degrees.
    #[serde(default = "default_starting_angle")]
    pub starting_angle_deg: f32,
    /// Swing speed, degrees per second.
    #[serde(default = "default_angular_velocity")]
    pub angular_velocity_deg: f32,
    /// Distance from the weapon pivot to the sprite's reference center.
    #[serde(default = "default_weapon_offset")]
    pub weapon_offset: f32,
    #[serde(default = "default_spikeball_texture")]
    pub spikeball_texture: String,
    #[serde(default = "default_weapon_texture")]
    pub weapon_texture: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            window_title: default_title(),
            window_scale: default_window_scale(),
            chain_length: default_chain_length(),
            starting_angle_deg: default_starting_angle(),
            angular_velocity_deg: default_angular_velocity(),
            weapon_offset: default_weapon_offset(),
            spikeball_texture: default_spikeball_texture(),
            weapon_texture: default_weapon_texture(),
        }
    }
}

pub fn load_config_from_path(path: &Path) -> Result<DemoConfig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;
    let config: DemoConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &DemoConfig) -> Result<(), String> {
    if config.window_scale == 0 {
        return Err("Config validation failed: window_scale must be >= 1".to_string());
    }
    if !(config.chain_length.is_finite() && config.chain_length > 0.0) {
        return Err(format!(
            "Config validation failed: chain_length must be a positive number, got {}",
            config.chain_length
        ));
    }
    if !(config.weapon_offset.is_finite() && config.weapon_offset > 0.0) {
        return Err(format!(
            "Config validation failed: weapon_offset must be a positive number, got {}",
            config.weapon_offset
        ));
    }
    if !config.starting_angle_deg.is_finite() || !config.angular_velocity_deg.is_finite() {
        return Err("Config validation failed: angles must be finite".to_string());
    }
    if config.spikeball_texture.is_empty() || config.weapon_texture.is_empty() {
        return Err("Config validation failed: texture paths must not be empty".to_string());
    }
    Ok(())
}

/// Polls the config file's mtime so edits can be applied at frame
/// boundaries without a platform file-watcher dependency.
pub struct ConfigWatcher {
    config_path: PathBuf,
    last_seen_modified: Option<SystemTime>,
}

impl ConfigWatcher {
    pub fn new(config_path: PathBuf) -> Self {
        let last_seen_modified = modified_time(&config_path);
        Self {
            config_path,
            last_seen_modified,
        }
    }

    pub fn should_reload(&mut self) -> bool {
        let current = modified_time(&self.config_path);
        match (self.last_seen_modified, current) {
            (Some(old), Some(now)) if now > old => {
                self.last_seen_modified = Some(now);
                true
            }
            (None, Some(now)) => {
                self.last_seen_modified = Some(now);
                true
            }
            _ => false,
        }
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).ok()?.modified().ok()
}

fn default_title() -> String {
    "Flail Demo".to_string()
}

const fn default_window_scale() -> u32 {
    5
}

const fn default_chain_length() -> f32 {
    32.0
}

const fn default_starting_angle() -> f32 {
    45.0
}

const fn default_angular_velocity() -> f32 {
    120.0
}

fn default_spikeball_texture() -> String {
    "assets/textures/spikeball.png".to_string()
}

fn default_weapon_texture() -> String {
    "assets/textures/weapon.png".to_string()
}

const fn default_weapon_offset() -> f32 {
    20.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "flail_config_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn empty_object_yields_defaults() {
        let path = temp_file_path("defaults");
        fs::write(&path, "{}").expect("write temp config");

        let config = load_config_from_path(&path).expect("empty config should load");
        assert_eq!(config, DemoConfig::default());
        assert_eq!(config.window_scale, 5);
        assert_eq!(config.chain_length, 32.0);
        assert_eq!(config.angular_velocity_deg, 120.0);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn explicit_fields_override_defaults() {
        let path = temp_file_path("override");
        fs::write(
            &path,
            r#"{ "window_title": "Swing", "chain_length": 48.0, "angular_velocity_deg": -90.0 }"#,
        )
        .expect("write temp config");

        let config = load_config_from_path(&path).expect("config should load");
        assert_eq!(config.window_title, "Swing");
        assert_eq!(config.chain_length, 48.0);
        // Negative angular velocity is a valid direction choice.
        assert_eq!(config.angular_velocity_deg, -90.0);
        assert_eq!(config.weapon_offset, 20.0);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn zero_window_scale_is_rejected() {
        let path = temp_file_path("zero_scale");
        fs::write(&path, r#"{ "window_scale": 0 }"#).expect("write temp config");

        let err = load_config_from_path(&path).expect_err("zero scale should fail");
        assert!(err.contains("window_scale"));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn nonpositive_chain_length_is_rejected() {
        let path = temp_file_path("bad_chain");
        fs::write(&path, r#"{ "chain_length": -3.0 }"#).expect("write temp config");

        let err = load_config_from_path(&path).expect_err("negative chain should fail");
        assert!(err.contains("chain_length"));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn empty_texture_path_is_rejected() {
        let path = temp_file_path("bad_texture");
        fs::write(&path, r#"{ "weapon_texture": "" }"#).expect("write temp config");

        let err = load_config_from_path(&path).expect_err("empty texture path should fail");
        assert!(err.contains("texture paths"));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_file_is_an_error() {
        let path = temp_file_path("missing");
        let _ = fs::remove_file(&path);
        let err = load_config_from_path(&path).expect_err("missing file should fail");
        assert!(err.contains("Failed to read"));
    }

    #[test]
    fn watcher_detects_newly_created_file() {
        let path = temp_file_path("watcher_create");
        let _ = fs::remove_file(&path);

        let mut watcher = ConfigWatcher::new(path.clone());
        assert!(!watcher.should_reload(), "missing file should not reload");

        fs::write(&path, "{}").expect("write temp config");
        assert!(
            watcher.should_reload(),
            "creating the file should trigger one reload"
        );
        assert!(
            !watcher.should_reload(),
            "second poll without changes should not reload"
        );

        let _ = fs::remove_file(path);
    }
}
