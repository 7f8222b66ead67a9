use crate::config::{Config, MenuLabels};
use crate::host::{HostError, NoteStore, Prompter};

/// Marker of a category line in the categories note.
const LIST_ITEM: &str = "- ";

/// What the category menu settled on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
	/// No category (feature disabled, no categories note, or skipped in the menu).
	Skip,
	Chosen(String),
	/// Task creation is aborted.
	Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
	Category(String),
	Skip,
	Add,
	Cancel,
}

/// Categories listed in the categories note, in file order.
pub fn load_categories(store: &dyn NoteStore, config: &Config) -> Result<Vec<String>, HostError> {
	let Some(path) = config.categories_path() else { return Ok(vec![]) };
	if !store.exists(&path) {
		log::debug!("categories note {} not found, skipping categories", path.display());
		return Ok(vec![]);
	}
	let text = store.read(&path)?;
	Ok(parse_categories(&text))
}

fn parse_categories(text: &str) -> Vec<String> {
	text.split('\n')
		.filter_map(|l| l.strip_prefix(LIST_ITEM))
		.map(|c| c.trim_end_matches('\r').to_string())
		.collect()
}

/// Menu shown to the user: categories, then skip, add and cancel.
pub fn menu_entries(categories: &[String], labels: &MenuLabels) -> Vec<String> {
	let mut out = categories.to_vec();
	out.push(labels.no_category.clone());
	out.push(labels.add_category.clone());
	out.push(labels.cancel.clone());
	out
}

fn entry_at(categories: &[String], idx: usize) -> Entry {
	match idx.checked_sub(categories.len()) {
		None => Entry::Category(categories[idx].clone()),
		Some(0) => Entry::Skip,
		Some(1) => Entry::Add,
		Some(_) => Entry::Cancel,
	}
}

/// Append `name` as a new list item to the categories note.
pub fn add_category(store: &mut dyn NoteStore, config: &Config, name: &str) -> Result<(), HostError> {
	let Some(path) = config.categories_path() else {
		log::warn!("categories are disabled, not adding {:?}", name);
		return Ok(());
	};
	let mut text = if store.exists(&path) { store.read(&path)? } else { String::new() };
	if !text.is_empty() && !text.ends_with('\n') {
		text.push('\n');
	}
	text.push_str(LIST_ITEM);
	text.push_str(name);
	store.write(&path, &text)?;
	log::info!("added category {:?} to {}", name, path.display());
	Ok(())
}

/// Ask the user for a category.
///
/// Dismissing the new-category prompt (or leaving it empty) shows the menu
/// again, at most `max_category_retries` times before giving up.
pub fn resolve_category(
	store: &mut dyn NoteStore,
	prompter: &mut dyn Prompter,
	config: &Config,
) -> Result<Resolution, HostError> {
	let Some(path) = config.categories_path() else { return Ok(Resolution::Skip) };
	if !store.exists(&path) {
		log::debug!("categories note {} not found, skipping categories", path.display());
		return Ok(Resolution::Skip);
	}
	let mut retries = 0u32;
	loop {
		// An existing note without items still offers skip, add and cancel.
		let categories = load_categories(store, config)?;
		let menu = menu_entries(&categories, &config.labels);
		let Some(idx) = prompter.choose("Category", &menu)? else {
			return Ok(Resolution::Cancelled);
		};
		match entry_at(&categories, idx) {
			Entry::Category(name) => return Ok(Resolution::Chosen(name)),
			Entry::Skip => return Ok(Resolution::Skip),
			Entry::Cancel => return Ok(Resolution::Cancelled),
			Entry::Add => match prompter.input("New category name")? {
				Some(name) if !name.trim().is_empty() => {
					let name = name.trim().to_string();
					add_category(store, config, &name)?;
					return Ok(Resolution::Chosen(name));
				}
				_ => {
					if retries >= config.max_category_retries {
						log::debug!("gave up after {} category retries", retries);
						return Ok(Resolution::Cancelled);
					}
					retries += 1;
				}
			},
		}
	}
}
