/// Prefix of a Markdown task item (`- [ ] ...`, `- [x] ...`).
const TASK_PREFIX: &str = "- [";

/// Line that closes a frontmatter block.
const FRONTMATTER_DELIMITER: &str = "---";

/// Insert `line` right under the first occurrence of `heading` in `note`.
///
/// When the heading is missing it is appended at the end of the note, separated
/// from earlier content by one blank line (unless the note ends with a
/// frontmatter delimiter). The new line goes on top of a task list that already
/// follows the heading; otherwise one blank line separates it from the heading.
pub fn insert_line(note: &str, heading: &str, line: &str) -> String {
	let mut text = note.to_string();
	let found = if heading.is_empty() { None } else { text.find(heading) };
	let at = match found {
		Some(idx) => idx + heading.len(),
		None => {
			if !text.is_empty() && !ends_with_frontmatter(&text) {
				let trailing = text.len() - text.trim_end_matches('\n').len();
				for _ in trailing..2 { text.push('\n'); }
			}
			text.push_str(heading);
			text.len()
		}
	};

	let rest = &text[at..];
	// `heading\n\n- [` keeps its blank line, `heading\n- [` stays tight.
	let (split, gap) = if task_after(rest, 2) {
		(char_offset(rest, 1), "\n")
	} else if task_after(rest, 1) {
		(0, "\n")
	} else {
		(0, "\n\n")
	};
	let split = at + split;

	let mut out = String::with_capacity(text.len() + gap.len() + line.len());
	out.push_str(&text[..split]);
	out.push_str(gap);
	out.push_str(line);
	out.push_str(&text[split..]);
	out
}

/// True when the last line is a newline-terminated `---`.
fn ends_with_frontmatter(text: &str) -> bool {
	let Some(body) = text.strip_suffix('\n') else { return false };
	let last = body.rsplit('\n').next().unwrap_or(body);
	last.trim_end_matches('\r') == FRONTMATTER_DELIMITER
}

/// True when a task prefix starts `skip` characters into `rest`.
fn task_after(rest: &str, skip: usize) -> bool {
	rest.char_indices()
		.nth(skip)
		.map(|(i, _)| rest[i..].starts_with(TASK_PREFIX))
		.unwrap_or(false)
}

fn char_offset(rest: &str, n: usize) -> usize {
	rest.char_indices().nth(n).map(|(i, _)| i).unwrap_or(rest.len())
}
