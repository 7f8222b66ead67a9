use std::fmt::Write;
use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::NaiveDate;

use crate::config::Config;

/// Path of the daily note for `date`: `<vault>/<daily_folder>/<stem>.md`.
pub fn note_path(config: &Config, date: NaiveDate) -> Result<PathBuf> {
	let mut stem = String::new();
	// chrono reports bad format specifiers through fmt::Error
	if write!(stem, "{}", date.format(&config.daily_format)).is_err() || stem.trim().is_empty() {
		bail!("invalid daily_format: {:?}", config.daily_format);
	}
	Ok(config.vault.join(&config.daily_folder).join(format!("{}.md", stem)))
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	fn date() -> NaiveDate {
		NaiveDate::from_ymd_opt(2025, 3, 7).unwrap()
	}

	#[test]
	fn default_layout() {
		let config = Config { vault: PathBuf::from("/v"), ..Config::default() };
		assert_eq!(note_path(&config, date()).unwrap(), PathBuf::from("/v/2025-03-07.md"));
	}

	#[test]
	fn folder_and_nested_format() {
		let config = Config {
			vault: PathBuf::from("/v"),
			daily_folder: PathBuf::from("Daily"),
			daily_format: "%Y/%m/%d %a".into(),
			..Config::default()
		};
		assert_eq!(note_path(&config, date()).unwrap(), PathBuf::from("/v/Daily/2025/03/07 Fri.md"));
	}

	#[test]
	fn bad_format_is_rejected() {
		let config = Config { daily_format: "%Q".into(), ..Config::default() };
		assert!(note_path(&config, date()).is_err());
		let config = Config { daily_format: "".into(), ..Config::default() };
		assert!(note_path(&config, date()).is_err());
	}
}
