use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use colored::Colorize;

#[derive(Debug, thiserror::Error)]
pub enum HostError {
	#[error("could not read {path}: {source}")]
	Read { path: PathBuf, source: io::Error },
	#[error("could not write {path}: {source}")]
	Write { path: PathBuf, source: io::Error },
	#[error("prompt failed: {0}")]
	Prompt(#[source] io::Error),
	#[error("could not open {path} in {editor}: {source}")]
	Open { path: PathBuf, editor: String, source: io::Error },
	#[error("no editor configured; set `editor`, $VISUAL or $EDITOR")]
	NoEditor,
}

/// Whole-file access to notes.
pub trait NoteStore {
	fn exists(&self, path: &Path) -> bool;
	fn read(&self, path: &Path) -> Result<String, HostError>;
	fn write(&mut self, path: &Path, text: &str) -> Result<(), HostError>;
}

/// Interactive prompts. `None` means the user dismissed the prompt.
pub trait Prompter {
	fn choose(&mut self, title: &str, options: &[String]) -> Result<Option<usize>, HostError>;
	fn input(&mut self, title: &str) -> Result<Option<String>, HostError>;
}

pub trait Notifier {
	fn notify(&self, message: &str);
}

#[derive(Debug, Default)]
pub struct FsStore;

impl NoteStore for FsStore {
	fn exists(&self, path: &Path) -> bool {
		path.is_file()
	}

	fn read(&self, path: &Path) -> Result<String, HostError> {
		fs::read_to_string(path).map_err(|source| HostError::Read { path: path.to_path_buf(), source })
	}

	fn write(&mut self, path: &Path, text: &str) -> Result<(), HostError> {
		let err = |source: io::Error| HostError::Write { path: path.to_path_buf(), source };
		if let Some(dir) = path.parent() {
			fs::create_dir_all(dir).map_err(err)?;
		}
		fs::write(path, text).map_err(err)?;
		log::debug!("wrote {} bytes to {}", text.len(), path.display());
		Ok(())
	}
}

/// Prompts on stderr, answers read line by line from any `BufRead`.
pub struct TerminalPrompter<R> {
	input: R,
}

impl TerminalPrompter<io::StdinLock<'static>> {
	pub fn stdin() -> Self {
		Self::new(io::stdin().lock())
	}
}

impl<R: BufRead> TerminalPrompter<R> {
	pub fn new(input: R) -> Self {
		Self { input }
	}

	fn read_line(&mut self) -> Result<Option<String>, HostError> {
		let mut buf = String::new();
		let n = self.input.read_line(&mut buf).map_err(HostError::Prompt)?;
		if n == 0 { return Ok(None); }
		Ok(Some(buf.trim_end_matches(['\n', '\r']).to_string()))
	}
}

impl<R: BufRead> Prompter for TerminalPrompter<R> {
	fn choose(&mut self, title: &str, options: &[String]) -> Result<Option<usize>, HostError> {
		let mut err = io::stderr();
		loop {
			let _ = writeln!(err, "{}", title.bold());
			for (i, opt) in options.iter().enumerate() {
				let _ = writeln!(err, "{:>3}. {}", (i + 1).to_string().cyan(), opt);
			}
			let _ = write!(err, "choice (empty to dismiss): ");
			let _ = err.flush();
			let Some(answer) = self.read_line()? else { return Ok(None) };
			let answer = answer.trim();
			if answer.is_empty() || answer.eq_ignore_ascii_case("q") {
				return Ok(None);
			}
			match answer.parse::<usize>() {
				Ok(n) if (1..=options.len()).contains(&n) => return Ok(Some(n - 1)),
				_ => {
					// Typing an option verbatim works too.
					if let Some(i) = options.iter().position(|o| o.trim() == answer) {
						return Ok(Some(i));
					}
					let _ = writeln!(err, "{}", format!("invalid choice: {}", answer).red());
				}
			}
		}
	}

	fn input(&mut self, title: &str) -> Result<Option<String>, HostError> {
		let mut err = io::stderr();
		let _ = write!(err, "{}: ", title.bold());
		let _ = err.flush();
		self.read_line()
	}
}

/// Desktop notification through `notify-send`, falling back to stdout.
#[derive(Debug)]
pub struct DesktopNotifier {
	program: String,
}

impl Default for DesktopNotifier {
	fn default() -> Self {
		DesktopNotifier { program: "notify-send".into() }
	}
}

impl DesktopNotifier {
	/// Send through the desktop notifier; false when it is missing or failed.
	fn send(&self, message: &str) -> bool {
		if which::which(&self.program).is_err() {
			return false;
		}
		match Command::new(&self.program).arg("dt").arg(message).status() {
			Ok(s) if s.success() => true,
			Ok(s) => {
				log::warn!("{} exited with {}", self.program, s);
				false
			}
			Err(e) => {
				log::warn!("{} failed: {}", self.program, e);
				false
			}
		}
	}
}

impl Notifier for DesktopNotifier {
	fn notify(&self, message: &str) {
		if !self.send(message) {
			println!("{}", message.green());
		}
	}
}

/// Open `path` in `editor`, waiting for it to exit.
pub fn open_in_editor(editor: Option<&str>, path: &Path) -> Result<(), HostError> {
	let editor = editor
		.map(str::to_string)
		.or_else(|| std::env::var("VISUAL").ok())
		.or_else(|| std::env::var("EDITOR").ok())
		.filter(|e| !e.trim().is_empty())
		.ok_or(HostError::NoEditor)?;
	let mut parts = editor.split_whitespace();
	let program = parts.next().ok_or(HostError::NoEditor)?;
	let program = which::which(program).unwrap_or_else(|_| PathBuf::from(program));
	log::info!("opening {} with {}", path.display(), program.display());
	Command::new(&program)
		.args(parts)
		.arg(path)
		.status()
		.map_err(|source| HostError::Open { path: path.to_path_buf(), editor: editor.clone(), source })?;
	Ok(())
}

#[cfg(test)]
pub mod fake {
	use super::*;
	use std::cell::RefCell;
	use std::collections::{HashMap, VecDeque};

	#[derive(Default)]
	pub struct MemStore {
		pub files: HashMap<PathBuf, String>,
		pub writes: usize,
	}

	impl MemStore {
		pub fn with(path: impl Into<PathBuf>, text: &str) -> Self {
			let mut s = Self::default();
			s.files.insert(path.into(), text.to_string());
			s
		}
	}

	impl NoteStore for MemStore {
		fn exists(&self, path: &Path) -> bool {
			self.files.contains_key(path)
		}

		fn read(&self, path: &Path) -> Result<String, HostError> {
			self.files.get(path).cloned().ok_or_else(|| HostError::Read {
				path: path.to_path_buf(),
				source: io::Error::from(io::ErrorKind::NotFound),
			})
		}

		fn write(&mut self, path: &Path, text: &str) -> Result<(), HostError> {
			self.writes += 1;
			self.files.insert(path.to_path_buf(), text.to_string());
			Ok(())
		}
	}

	pub enum Answer {
		Pick(usize),
		Text(&'static str),
		Dismiss,
	}

	/// Replays scripted answers and records every menu it was shown.
	#[derive(Default)]
	pub struct Scripted {
		pub answers: VecDeque<Answer>,
		pub menus: Vec<Vec<String>>,
	}

	impl Scripted {
		pub fn new(answers: Vec<Answer>) -> Self {
			Self { answers: answers.into(), menus: Vec::new() }
		}
	}

	impl Prompter for Scripted {
		fn choose(&mut self, _title: &str, options: &[String]) -> Result<Option<usize>, HostError> {
			self.menus.push(options.to_vec());
			match self.answers.pop_front() {
				Some(Answer::Pick(i)) => Ok(Some(i)),
				Some(Answer::Dismiss) | None => Ok(None),
				Some(Answer::Text(t)) => panic!("expected a pick, got text {:?}", t),
			}
		}

		fn input(&mut self, _title: &str) -> Result<Option<String>, HostError> {
			match self.answers.pop_front() {
				Some(Answer::Text(t)) => Ok(Some(t.to_string())),
				Some(Answer::Dismiss) | None => Ok(None),
				Some(Answer::Pick(i)) => panic!("expected text, got pick {}", i),
			}
		}
	}

	#[derive(Default)]
	pub struct Recorder {
		pub messages: RefCell<Vec<String>>,
	}

	impl Notifier for Recorder {
		fn notify(&self, message: &str) {
			self.messages.borrow_mut().push(message.to_string());
		}
	}
}
