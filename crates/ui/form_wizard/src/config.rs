use std::{env, fs, path::PathBuf};

use color_eyre::Result;
use directories::ProjectDirs;
use lazy_static::lazy_static;
use serde::Deserialize;
use tracing::debug;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub config_dir: PathBuf,
}

/// Defaults for the fill screen; command line flags win over these.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct FormConfig {
    #[serde(default)]
    pub submit_label: Option<String>,
    #[serde(default)]
    pub reset_label: Option<String>,
    #[serde(default)]
    pub hide_submit: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default = "default_tick_rate")]
    pub tick_rate: f64,
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f64,
    #[serde(default)]
    pub form: FormConfig,
}

fn default_tick_rate() -> f64 {
    4.0
}

fn default_frame_rate() -> f64 {
    30.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            tick_rate: default_tick_rate(),
            frame_rate: default_frame_rate(),
            form: FormConfig::default(),
        }
    }
}

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref DATA_FOLDER: Option<PathBuf> =
        env::var(format!("{}_DATA", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        env::var(format!("{}_CONFIG", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref LOG_ENV: String = format!("{}_LOGLEVEL", PROJECT_NAME.clone());
    pub static ref LOG_FILE: String = format!("{}.log", env!("CARGO_PKG_NAME").replace('_', "-"));
}

impl Config {
    pub fn new() -> Result<Self, config::ConfigError> {
        let data_dir = get_data_dir();
        let config_dir = get_config_dir();
        Self::load(&config_dir, &data_dir)
    }

    /// Layer `config.json5` / `config.toml` from `config_dir` over the defaults.
    pub fn load(
        config_dir: &std::path::Path,
        data_dir: &std::path::Path,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("data_dir", data_dir.to_string_lossy().to_string())?
            .set_default("config_dir", config_dir.to_string_lossy().to_string())?;

        let config_files = [
            ("config.json5", config::FileFormat::Json5),
            ("config.toml", config::FileFormat::Toml),
        ];
        let mut found_config = false;
        for (file, format) in &config_files {
            let source = config::File::from(config_dir.join(file))
                .format(*format)
                .required(false);
            builder = builder.add_source(source);
            if config_dir.join(file).exists() {
                found_config = true
            }
        }
        if !found_config {
            debug!("No configuration file found, using defaults");
        }

        builder.build()?.try_deserialize()
    }
}

pub fn get_data_dir() -> PathBuf {
    if let Some(s) = DATA_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

pub fn get_config_dir() -> PathBuf {
    if let Some(s) = CONFIG_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.config_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".config")
    }
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "forge-of-stories", env!("CARGO_PKG_NAME"))
}

pub fn ensure_data_and_config_dirs_exist() -> std::io::Result<()> {
    fs::create_dir_all(get_data_dir())?;
    fs::create_dir_all(get_config_dir())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("form-wizard-{name}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn defaults_without_files() {
        let dir = scratch_dir("empty");
        let cfg = Config::load(&dir, &dir).unwrap();
        assert_eq!(cfg.tick_rate, 4.0);
        assert_eq!(cfg.frame_rate, 30.0);
        assert_eq!(cfg.form, FormConfig::default());
        assert_eq!(cfg.config.config_dir, dir);
    }

    #[test]
    fn json5_file_overrides_defaults() {
        let dir = scratch_dir("json5");
        fs::write(
            dir.join("config.json5"),
            r#"{
                // trailing commas and comments are fine here
                frame_rate: 60,
                form: { submit_label: "Send", hide_submit: true, },
            }"#,
        )
        .unwrap();
        let cfg = Config::load(&dir, &dir).unwrap();
        assert_eq!(cfg.frame_rate, 60.0);
        assert_eq!(cfg.form.submit_label.as_deref(), Some("Send"));
        assert!(cfg.form.hide_submit);
        assert_eq!(cfg.form.reset_label, None);
    }
}
