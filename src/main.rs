use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;

mod category;
mod config;
mod daily;
mod host;
mod insert;
mod task;

use config::Config;
use host::{DesktopNotifier, FsStore, TerminalPrompter};
use task::{CategoryChoice, Host, Outcome, TaskDraft};

#[derive(Parser)]
#[command(
	name = "dt",
	version,
	about = "Add tasks to today's daily note",
	long_about = "Inserts a Markdown task under a heading of a daily note, creating the heading when it is missing.\n\nTasks can be tagged with a category picked from a list kept in a separate note.",
	after_help = "Examples:\n  dt add \"Call the plumber\"\n  dt add -p high --due 2025-11-10 \"Send invoice\"\n  dt add -c work \"Review PR\"\n  dt add                      (asks for category and text)\n  dt categories list\n  dt categories add errands\n  dt path -d 2025-11-04"
)]
struct Cli {
	#[command(flatten)]
	overrides: Overrides,
	#[command(subcommand)]
	action: Action,
}

#[derive(Args)]
struct Overrides {
	/// Config file (default: $DAILY_TASK_CONFIG or the platform config dir)
	#[arg(long, global = true)]
	config: Option<PathBuf>,
	/// Notes folder
	#[arg(long, global = true)]
	vault: Option<PathBuf>,
	/// Heading the task is inserted under
	#[arg(long, global = true)]
	heading: Option<String>,
	/// Categories note, relative to the vault ("" disables categories)
	#[arg(long = "categories-note", global = true)]
	categories_note: Option<String>,
	/// Open the note in $EDITOR after inserting
	#[arg(long, global = true)]
	open: bool,
}

#[derive(Subcommand)]
enum Action {
	/// Add a task to a daily note (default today)
	Add {
		/// Task text (asked for when omitted)
		text: Vec<String>,
		/// Daily note date YYYY-MM-DD (default: today)
		#[arg(short = 'd', long = "date")]
		date: Option<String>,
		/// Due date YYYY-MM-DD
		#[arg(long = "due")]
		due: Option<String>,
		/// Priority: low, med, high (or 1/2/3)
		#[arg(short = 'p', long = "priority")]
		priority: Option<String>,
		/// Category, skipping the menu
		#[arg(short = 'c', long = "category", conflicts_with = "no_category")]
		category: Option<String>,
		/// Do not tag the task with a category
		#[arg(long = "no-category")]
		no_category: bool,
	},
	/// List or add categories
	Categories {
		#[command(subcommand)]
		cmd: CategoriesCmd,
	},
	/// Print the daily note path for a date (default today)
	Path {
		#[arg(short = 'd', long = "date")]
		date: Option<String>,
	},
	/// Print the effective configuration
	Config,
}

#[derive(Subcommand)]
enum CategoriesCmd {
	/// List categories
	List,
	/// Append a category to the categories note
	Add {
		name: Vec<String>,
	},
}

fn main() -> Result<()> {
	env_logger::Builder::from_env(env_logger::Env::new().filter_or("DT_LOG", "warn")).init();
	let cli = Cli::parse();
	let config = load_config(&cli.overrides)?;
	match cli.action {
		Action::Add { text, date, due, priority, category, no_category } => {
			let date = parse_or_today(date.as_deref())?;
			let draft = TaskDraft {
				text: text.join(" "),
				due: due.as_deref().map(parse_date).transpose()?,
				priority: task::parse_priority_opt(priority.as_deref())?,
			};
			let choice = match (category, no_category) {
				(Some(c), _) => CategoryChoice::Given(c),
				(None, true) => CategoryChoice::None,
				(None, false) => CategoryChoice::Menu,
			};
			let mut store = FsStore;
			let mut prompter = TerminalPrompter::stdin();
			let notifier = DesktopNotifier::default();
			let host = Host { store: &mut store, prompter: &mut prompter, notifier: &notifier };
			match task::add_task(host, &config, date, draft, choice)? {
				Outcome::Added { path, line } => log::debug!("{} <- {}", path.display(), line),
				Outcome::Cancelled => {}
			}
		}
		Action::Categories { cmd } => match cmd {
			CategoriesCmd::List => {
				if config.categories_path().is_none() {
					println!("Categories are disabled (set categories_note)");
					return Ok(());
				}
				let cats = category::load_categories(&FsStore, &config)?;
				if cats.is_empty() {
					println!("No categories");
				}
				for (i, c) in cats.iter().enumerate() {
					println!("{:>3}. {}", i + 1, c);
				}
			}
			CategoriesCmd::Add { name } => {
				let name = name.join(" ");
				let name = name.trim();
				if name.is_empty() {
					anyhow::bail!("category name is empty");
				}
				let path = config.categories_path().context("categories are disabled (set categories_note)")?;
				category::add_category(&mut FsStore, &config, name)?;
				println!("Added {} to {}", name.bold(), path.display());
			}
		},
		Action::Path { date } => {
			let date = parse_or_today(date.as_deref())?;
			println!("{}", daily::note_path(&config, date)?.display());
		}
		Action::Config => {
			print!("{}", toml::to_string_pretty(&config).context("serialize config")?);
		}
	}
	Ok(())
}

fn load_config(o: &Overrides) -> Result<Config> {
	let path = match &o.config {
		Some(p) => p.clone(),
		None => Config::path()?,
	};
	let mut config = Config::load(&path)?;
	if let Some(v) = &o.vault { config.vault = v.clone(); }
	if let Some(h) = &o.heading { config.heading = h.clone(); }
	if let Some(c) = &o.categories_note { config.categories_note = c.clone(); }
	if o.open { config.open_note = true; }
	Ok(config)
}

fn parse_or_today(s: Option<&str>) -> Result<NaiveDate> {
	match s {
		Some(v) => parse_date(v),
		None => Ok(Local::now().date_naive()),
	}
}

fn parse_date(s: &str) -> Result<NaiveDate> {
	NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("invalid date: {}", s))
}
