//! Line tokenizer shared by the engine's text formats.
//!
//! The plain-text level and script formats all follow the same surface
//! conventions: `#` starts a comment, double quotes group a token with
//! spaces, and most content lines read `KEY: value value…` with
//! continuation lines attached to the key above. The parsers for those
//! formats live with their consumers; this module only supplies the
//! tokenizing and grouping they share.

/// A tokenized source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenLine {
	/// 1-based line number in the source.
	pub number: usize,
	/// Tokens in order of appearance.
	pub tokens: Vec<String>,
}

/// A `KEY: value…` line with its continuation lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyGroup {
	/// The key, without its trailing colon. Empty for the preamble group
	/// holding lines before the first keyed line.
	pub key: String,
	/// Tokens following the key on the same line.
	pub values: Vec<String>,
	/// Token lines until the next keyed line.
	pub lines: Vec<TokenLine>,
}

/// Splits one line into tokens, honoring `#` comments and double quotes.
///
/// # Examples
///
/// ```
/// use jedi_types::file::text::tokenize_line;
///
/// let tokens = tokenize_line(r#"TEXTURE: "STAR WARS.BM" 3 # trailing"#);
/// assert_eq!(tokens, ["TEXTURE:", "STAR WARS.BM", "3"]);
/// ```
pub fn tokenize_line(line: &str) -> Vec<String> {
	let mut tokens = Vec::new();
	let mut current = String::new();
	let mut in_quotes = false;

	for c in line.chars() {
		match c {
			'"' => {
				if in_quotes {
					tokens.push(std::mem::take(&mut current));
				}
				in_quotes = !in_quotes;
			}
			'#' if !in_quotes => break,
			c if c.is_whitespace() && !in_quotes => {
				if !current.is_empty() {
					tokens.push(std::mem::take(&mut current));
				}
			}
			c => current.push(c),
		}
	}
	if !current.is_empty() {
		tokens.push(current);
	}

	tokens
}

/// Tokenizes a whole source, keeping non-empty lines with their numbers.
pub fn tokenize(source: &str) -> Vec<TokenLine> {
	source
		.lines()
		.enumerate()
		.filter_map(|(i, line)| {
			let tokens = tokenize_line(line);
			if tokens.is_empty() {
				return None;
			}
			Some(TokenLine {
				number: i + 1,
				tokens,
			})
		})
		.collect()
}

/// Groups token lines by `KEY:` markers.
///
/// A line whose first token ends with a colon starts a new group; every
/// following line without such a token belongs to the current group.
/// Lines before the first keyed line land in a leading group with an
/// empty key.
pub fn group_key_values(lines: &[TokenLine]) -> Vec<KeyGroup> {
	let mut groups: Vec<KeyGroup> = Vec::new();

	for line in lines {
		let first = &line.tokens[0];
		if let Some(key) = first.strip_suffix(':') {
			groups.push(KeyGroup {
				key: key.to_string(),
				values: line.tokens[1..].to_vec(),
				lines: Vec::new(),
			});
		} else {
			if groups.is_empty() {
				groups.push(KeyGroup {
					key: String::new(),
					values: Vec::new(),
					lines: Vec::new(),
				});
			}
			if let Some(group) = groups.last_mut() {
				group.lines.push(line.clone());
			}
		}
	}

	groups
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_comments_stripped() {
		assert_eq!(tokenize_line("A B # C D"), ["A", "B"]);
		assert!(tokenize_line("# whole line").is_empty());
	}

	#[test]
	fn test_quotes_group_tokens() {
		assert_eq!(tokenize_line(r#"NAME "TWO WORDS" tail"#), ["NAME", "TWO WORDS", "tail"]);
		// A '#' inside quotes is literal
		assert_eq!(tokenize_line(r#""A # B""#), ["A # B"]);
	}

	#[test]
	fn test_line_numbers() {
		let lines = tokenize("first\n\n# comment only\nfourth");
		assert_eq!(lines.len(), 2);
		assert_eq!(lines[0].number, 1);
		assert_eq!(lines[1].number, 4);
	}

	#[test]
	fn test_key_grouping() {
		let lines = tokenize("preamble\nTEXTURES: 2\nA.BM\nB.BM\nPAL: X.PAL");
		let groups = group_key_values(&lines);

		assert_eq!(groups.len(), 3);
		assert_eq!(groups[0].key, "");
		assert_eq!(groups[0].lines.len(), 1);
		assert_eq!(groups[1].key, "TEXTURES");
		assert_eq!(groups[1].values, ["2"]);
		assert_eq!(groups[1].lines.len(), 2);
		assert_eq!(groups[2].key, "PAL");
		assert_eq!(groups[2].values, ["X.PAL"]);
	}
}
