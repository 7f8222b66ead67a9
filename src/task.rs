use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;

use crate::category::{resolve_category, Resolution};
use crate::config::Config;
use crate::daily;
use crate::host::{open_in_editor, NoteStore, Notifier, Prompter};
use crate::insert::insert_line;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
	Low,
	Medium,
	High,
}

impl Priority {
	/// Tasks plugin emoji.
	fn marker(self) -> &'static str {
		match self {
			Priority::High => "⏫",
			Priority::Medium => "🔼",
			Priority::Low => "🔽",
		}
	}
}

pub fn parse_priority_opt(v: Option<&str>) -> Result<Option<Priority>> {
	match v {
		None => Ok(None),
		Some(s) => {
			let s = s.to_lowercase();
			let p = match s.as_str() {
				"3" | "high" | "h" => Priority::High,
				"2" | "med" | "m" | "medium" => Priority::Medium,
				"1" | "low" | "l" => Priority::Low,
				_ => bail!("invalid priority: {}", s),
			};
			Ok(Some(p))
		}
	}
}

/// Task as entered by the user, before it becomes a Markdown line.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
	pub text: String,
	pub due: Option<NaiveDate>,
	pub priority: Option<Priority>,
}

impl TaskDraft {
	pub fn line(&self) -> String {
		let mut line = format!("- [ ] {}", self.text.trim());
		if let Some(p) = self.priority {
			line.push(' ');
			line.push_str(p.marker());
		}
		if let Some(d) = self.due {
			line.push_str(&format!(" 📅 {}", d.format("%Y-%m-%d")));
		}
		line
	}
}

/// Category annotation appended to a task line.
pub fn with_category(line: &str, category: &str) -> String {
	format!("{} [:: {}]", line, category)
}

/// How the category is decided for `add_task`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryChoice {
	/// Ask through the category menu.
	Menu,
	Given(String),
	None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
	Added { path: PathBuf, line: String },
	Cancelled,
}

pub struct Host<'a> {
	pub store: &'a mut dyn NoteStore,
	pub prompter: &'a mut dyn Prompter,
	pub notifier: &'a dyn Notifier,
}

/// Insert a new task into the daily note for `date`.
///
/// With an empty `draft.text` the text is asked for interactively. Dismissing
/// any prompt returns `Outcome::Cancelled` and leaves every note untouched.
pub fn add_task(host: Host<'_>, config: &Config, date: NaiveDate, mut draft: TaskDraft, category: CategoryChoice) -> Result<Outcome> {
	let Host { store, prompter, notifier } = host;
	let category = match category {
		CategoryChoice::Menu => match resolve_category(store, prompter, config)? {
			Resolution::Cancelled => {
				log::info!("category menu cancelled");
				return Ok(Outcome::Cancelled);
			}
			Resolution::Skip => None,
			Resolution::Chosen(c) => Some(c),
		},
		CategoryChoice::Given(c) if !c.trim().is_empty() => Some(c.trim().to_string()),
		CategoryChoice::Given(_) | CategoryChoice::None => None,
	};

	if draft.text.trim().is_empty() {
		match prompter.input("Task")? {
			Some(t) if !t.trim().is_empty() => draft.text = t,
			_ => {
				log::info!("no task text, nothing to add");
				return Ok(Outcome::Cancelled);
			}
		}
	}

	let mut line = draft.line();
	if let Some(c) = &category {
		line = with_category(&line, c);
	}

	let path = daily::note_path(config, date)?;
	let note = if store.exists(&path) { store.read(&path)? } else { String::new() };
	let updated = insert_line(&note, &config.heading, &line);
	store.write(&path, &updated)?;
	log::info!("inserted {:?} into {}", line, path.display());

	if config.notify {
		notifier.notify("Task added");
	}
	if config.open_note {
		open_in_editor(config.editor.as_deref(), &path).with_context(|| format!("open {}", path.display()))?;
	}
	Ok(Outcome::Added { path, line })
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::host::fake::{Answer, MemStore, Recorder, Scripted};
	use pretty_assertions::assert_eq;

	fn date() -> NaiveDate {
		NaiveDate::from_ymd_opt(2025, 3, 7).unwrap()
	}

	fn config() -> Config {
		Config {
			vault: PathBuf::from("/vault"),
			daily_folder: PathBuf::from("Daily"),
			categories_note: "Categories.md".into(),
			..Config::default()
		}
	}

	fn note() -> PathBuf {
		PathBuf::from("/vault/Daily/2025-03-07.md")
	}

	fn draft(text: &str) -> TaskDraft {
		TaskDraft { text: text.into(), ..TaskDraft::default() }
	}

	#[test]
	fn line_formatting() {
		assert_eq!(draft("  buy milk ").line(), "- [ ] buy milk");
		let d = TaskDraft { text: "ship".into(), due: Some(date()), priority: Some(Priority::High) };
		assert_eq!(d.line(), "- [ ] ship ⏫ 📅 2025-03-07");
		assert_eq!(with_category("- [ ] ship", "work"), "- [ ] ship [:: work]");
	}

	#[test]
	fn priority_aliases() {
		assert_eq!(parse_priority_opt(Some("H")).unwrap(), Some(Priority::High));
		assert_eq!(parse_priority_opt(Some("2")).unwrap(), Some(Priority::Medium));
		assert_eq!(parse_priority_opt(None).unwrap(), None);
		assert!(parse_priority_opt(Some("urgent")).is_err());
	}

	#[test]
	fn adds_to_missing_note_with_menu_category() {
		let mut store = MemStore::with("/vault/Categories.md", "- work\n- home\n");
		let mut prompter = Scripted::new(vec![Answer::Pick(0)]);
		let notifier = Recorder::default();
		let host = Host { store: &mut store, prompter: &mut prompter, notifier: &notifier };
		let out = add_task(host, &config(), date(), draft("report"), CategoryChoice::Menu).unwrap();
		assert_eq!(out, Outcome::Added { path: note(), line: "- [ ] report [:: work]".into() });
		assert_eq!(store.files[&note()], "## Задачи\n\n- [ ] report [:: work]");
		assert_eq!(*notifier.messages.borrow(), vec!["Task added".to_string()]);
	}

	#[test]
	fn skip_category_adds_plain_line_on_top_of_list() {
		let mut store = MemStore::with("/vault/Categories.md", "- work\n");
		store.files.insert(note(), "# Friday\n\n## Задачи\n- [ ] old\n".into());
		let mut prompter = Scripted::new(vec![Answer::Pick(1)]);
		let notifier = Recorder::default();
		let host = Host { store: &mut store, prompter: &mut prompter, notifier: &notifier };
		add_task(host, &config(), date(), draft("new"), CategoryChoice::Menu).unwrap();
		assert_eq!(store.files[&note()], "# Friday\n\n## Задачи\n- [ ] new\n- [ ] old\n");
	}

	#[test]
	fn cancelled_menu_writes_nothing() {
		let mut store = MemStore::with("/vault/Categories.md", "- work\n");
		let mut prompter = Scripted::new(vec![Answer::Pick(3)]);
		let notifier = Recorder::default();
		let host = Host { store: &mut store, prompter: &mut prompter, notifier: &notifier };
		let out = add_task(host, &config(), date(), draft("x"), CategoryChoice::Menu).unwrap();
		assert_eq!(out, Outcome::Cancelled);
		assert_eq!(store.writes, 0);
		assert!(notifier.messages.borrow().is_empty());
	}

	#[test]
	fn text_is_prompted_when_missing_and_dismissal_aborts() {
		let c = Config { categories_note: String::new(), ..config() };
		let mut store = MemStore::default();
		let mut prompter = Scripted::new(vec![Answer::Text("from prompt"), Answer::Dismiss, Answer::Text("   ")]);
		let notifier = Recorder::default();

		let host = Host { store: &mut store, prompter: &mut prompter, notifier: &notifier };
		let out = add_task(host, &c, date(), draft(""), CategoryChoice::Menu).unwrap();
		assert!(matches!(out, Outcome::Added { .. }));

		let host = Host { store: &mut store, prompter: &mut prompter, notifier: &notifier };
		assert_eq!(add_task(host, &c, date(), draft(""), CategoryChoice::Menu).unwrap(), Outcome::Cancelled);
		let host = Host { store: &mut store, prompter: &mut prompter, notifier: &notifier };
		assert_eq!(add_task(host, &c, date(), draft(""), CategoryChoice::Menu).unwrap(), Outcome::Cancelled);
		assert_eq!(store.writes, 1);
		assert_eq!(store.files[&note()], "## Задачи\n\n- [ ] from prompt");
	}

	#[test]
	fn given_category_bypasses_menu() {
		let mut store = MemStore::default();
		let mut prompter = Scripted::default();
		let notifier = Recorder::default();
		let c = Config { notify: false, ..config() };
		let host = Host { store: &mut store, prompter: &mut prompter, notifier: &notifier };
		add_task(host, &c, date(), draft("a"), CategoryChoice::Given("home".into())).unwrap();
		assert!(prompter.menus.is_empty());
		assert!(notifier.messages.borrow().is_empty());
		assert_eq!(store.files[&note()], "## Задачи\n\n- [ ] a [:: home]");
	}

	#[test]
	fn frontmatter_note_gets_heading_without_padding() {
		let mut store = MemStore::with(note(), "---\ntags: daily\n---\n");
		let mut prompter = Scripted::default();
		let notifier = Recorder::default();
		let host = Host { store: &mut store, prompter: &mut prompter, notifier: &notifier };
		add_task(host, &config(), date(), draft("a"), CategoryChoice::None).unwrap();
		assert_eq!(store.files[&note()], "---\ntags: daily\n---\n## Задачи\n\n- [ ] a");
	}
}
