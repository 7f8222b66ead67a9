use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Env var naming an explicit config file.
pub const CONFIG_ENV: &str = "DAILY_TASK_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("cannot resolve project dirs")]
	NoProjectDirs,
	#[error("could not read {path}: {source}")]
	Read { path: PathBuf, source: std::io::Error },
	#[error("could not parse {path}: {source}")]
	Parse { path: PathBuf, source: toml::de::Error },
}

/// Settings for one run of `dt`, read from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
	/// Root folder holding the notes.
	pub vault: PathBuf,
	/// Folder for daily notes, relative to the vault.
	pub daily_folder: PathBuf,
	/// strftime pattern for the daily note file stem.
	pub daily_format: String,
	/// Text the new task is inserted under.
	pub heading: String,
	/// Open the daily note in an editor after inserting.
	pub open_note: bool,
	pub editor: Option<String>,
	/// Note holding the categories as list items, relative to the vault.
	/// Empty disables categories.
	pub categories_note: String,
	/// How often the menu is shown again after the new category prompt is dismissed.
	pub max_category_retries: u32,
	pub notify: bool,
	pub labels: MenuLabels,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuLabels {
	pub no_category: String,
	pub add_category: String,
	pub cancel: String,
}

impl Default for MenuLabels {
	fn default() -> Self {
		MenuLabels {
			no_category: "-- no category --".into(),
			add_category: "-- add category --".into(),
			cancel: "-- cancel --".into(),
		}
	}
}

impl Default for Config {
	fn default() -> Self {
		Config {
			vault: default_vault(),
			daily_folder: PathBuf::new(),
			daily_format: "%Y-%m-%d".into(),
			heading: "## Задачи".into(),
			open_note: false,
			editor: None,
			categories_note: String::new(),
			max_category_retries: 3,
			notify: true,
			labels: MenuLabels::default(),
		}
	}
}

fn project_dirs() -> Option<ProjectDirs> {
	ProjectDirs::from("dev", "local", "daily_task")
}

fn default_vault() -> PathBuf {
	project_dirs().map(|p| p.data_dir().to_path_buf()).unwrap_or_else(|| PathBuf::from("."))
}

impl Config {
	/// Config file location: `$DAILY_TASK_CONFIG`, else the platform config dir.
	pub fn path() -> Result<PathBuf, ConfigError> {
		if let Some(p) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
			return Ok(PathBuf::from(p));
		}
		let proj = project_dirs().ok_or(ConfigError::NoProjectDirs)?;
		Ok(proj.config_dir().join("config.toml"))
	}

	/// Load from `path`, falling back to defaults when the file does not exist.
	pub fn load(path: &Path) -> Result<Config, ConfigError> {
		if !path.exists() {
			log::debug!("no config at {}, using defaults", path.display());
			return Ok(Config::default());
		}
		let text = fs::read_to_string(path).map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
		let config = toml::from_str(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
		log::debug!("loaded config from {}", path.display());
		Ok(config)
	}

	/// Categories note path, or `None` when categories are disabled.
	pub fn categories_path(&self) -> Option<PathBuf> {
		if self.categories_note.trim().is_empty() {
			return None;
		}
		Some(self.vault.join(&self.categories_note))
	}
}
