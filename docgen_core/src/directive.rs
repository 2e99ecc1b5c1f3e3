use logos::Logos;

use crate::DocgenError;
use crate::DocgenResult;

pub const INCLUDE_CODE_TAG: &str = "INCLUDE_CODE:";
pub const INCLUDE_CODE_SEGMENT_TAG: &str = "INCLUDE_CODE_SEGMENT:";
pub const INCLUDE_MD_TAG: &str = "INCLUDE_MD:";
pub const COMMENT_START: &str = "<!--";
pub const COMMENT_END: &str = "-->";
pub const HEADING_MARKER: char = '#';
pub const IMAGE_ASSET_PATH: &str = "assets/img";

/// A classified markdown line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
	/// `<!-- INCLUDE_CODE: path -->`
	IncludeCode { path: String },
	/// `<!-- INCLUDE_CODE_SEGMENT: {file: path, segment: name} -->`
	IncludeCodeSegment { path: String, segment: String },
	/// The heading on the first line of a document.
	FrontMatter { heading: String },
	/// `![alt](assets/img/...)`
	ImageAttachment { url: String },
	/// `<!-- INCLUDE_MD: path -->`
	IncludeMarkdown { path: String },
	/// Anything else.
	Plain,
}

/// The kinds of [`Directive`] in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
	IncludeCode,
	IncludeCodeSegment,
	FrontMatter,
	ImageAttachment,
	IncludeMarkdown,
}

struct DirectiveRule {
	kind: DirectiveKind,
	matches: fn(&str, usize) -> bool,
	build: fn(&str) -> DocgenResult<Directive>,
}

/// Classification rules. The first rule that matches a line decides its
/// directive.
const DIRECTIVE_RULES: [DirectiveRule; 5] = [
	DirectiveRule {
		kind: DirectiveKind::IncludeCode,
		matches: |line, _| line.contains(INCLUDE_CODE_TAG),
		build: |line| {
			Ok(Directive::IncludeCode {
				path: include_path(line, INCLUDE_CODE_TAG)?,
			})
		},
	},
	DirectiveRule {
		kind: DirectiveKind::IncludeCodeSegment,
		matches: |line, _| line.contains(INCLUDE_CODE_SEGMENT_TAG),
		build: parse_segment_directive,
	},
	DirectiveRule {
		kind: DirectiveKind::FrontMatter,
		matches: |line, line_number| line_number == 1 && line.contains(HEADING_MARKER),
		build: |line| {
			Ok(Directive::FrontMatter {
				heading: line.to_string(),
			})
		},
	},
	DirectiveRule {
		kind: DirectiveKind::ImageAttachment,
		matches: |line, _| is_image_attachment_line(line),
		build: |line| {
			Ok(Directive::ImageAttachment {
				url: image_url(line)?,
			})
		},
	},
	DirectiveRule {
		kind: DirectiveKind::IncludeMarkdown,
		matches: |line, _| line.contains(INCLUDE_MD_TAG),
		build: |line| {
			Ok(Directive::IncludeMarkdown {
				path: include_path(line, INCLUDE_MD_TAG)?,
			})
		},
	},
];

/// The rule order, exposed so precedence can be inspected.
pub fn directive_precedence() -> Vec<DirectiveKind> {
	DIRECTIVE_RULES.iter().map(|rule| rule.kind).collect()
}

/// Classify one line of a document. `line_number` is 1-based; only the first
/// line can become front matter.
pub fn parse_directive(line: &str, line_number: usize) -> DocgenResult<Directive> {
	match DIRECTIVE_RULES
		.iter()
		.find(|rule| (rule.matches)(line, line_number))
	{
		Some(rule) => (rule.build)(line),
		None => Ok(Directive::Plain),
	}
}

/// Whether a line attaches an image stored under `assets/img`.
pub fn is_image_attachment_line(line: &str) -> bool {
	line.trim_start().starts_with("![") && line.contains(IMAGE_ASSET_PATH)
}

/// The url of an image attachment line: the text after the first `](`, with
/// closing parentheses removed.
pub fn image_url(line: &str) -> DocgenResult<String> {
	let trimmed = line.trim();
	let Some((_, rest)) = trimmed.split_once("](") else {
		return Err(DocgenError::MalformedImageAttachment(line.to_string()));
	};
	let url = rest.split("](").next().unwrap_or(rest).replace(')', "");

	if url.is_empty() {
		return Err(DocgenError::MalformedImageAttachment(line.to_string()));
	}

	Ok(url)
}

/// Remove the html comment markers and the tag, leaving the directive body.
fn directive_body(line: &str, tag: &str) -> String {
	line.replace(COMMENT_START, "")
		.replace(COMMENT_END, "")
		.replace(tag, "")
		.trim()
		.to_string()
}

fn include_path(line: &str, tag: &str) -> DocgenResult<String> {
	let path = directive_body(line, tag);
	if path.is_empty() {
		return Err(DocgenError::MalformedDirective {
			line: line.to_string(),
			reason: "missing file path".to_string(),
		});
	}

	Ok(path)
}

#[derive(Logos, Debug, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
enum SegmentToken<'a> {
	#[token("{")]
	BraceOpen,
	#[token("}")]
	BraceClose,
	#[token(",")]
	Comma,
	#[token(":")]
	Colon,
	#[regex(r"[^{},:\s]+", |lex| lex.slice())]
	Word(&'a str),
}

/// One `key: value` field of a segment directive body.
#[derive(Debug, Default)]
struct SegmentField<'a> {
	key: Option<&'a str>,
	words: Vec<&'a str>,
	has_colon: bool,
}

fn parse_segment_directive(line: &str) -> DocgenResult<Directive> {
	let malformed = |reason: &str| {
		DocgenError::MalformedDirective {
			line: line.to_string(),
			reason: reason.to_string(),
		}
	};
	let body = directive_body(line, INCLUDE_CODE_SEGMENT_TAG);

	let mut fields = vec![SegmentField::default()];
	for token in SegmentToken::lexer(&body) {
		let token = token.map_err(|()| malformed("unexpected character"))?;
		if token == SegmentToken::Comma {
			fields.push(SegmentField::default());
			continue;
		}
		let Some(field) = fields.last_mut() else {
			return Err(malformed("empty directive"));
		};

		match token {
			SegmentToken::BraceOpen | SegmentToken::BraceClose | SegmentToken::Comma => {}
			SegmentToken::Colon if !field.has_colon => {
				field.has_colon = true;
				field.key = field.words.pop();
				if field.key.is_none() || !field.words.is_empty() {
					return Err(malformed("expected `key: value`"));
				}
			}
			SegmentToken::Colon => return Err(malformed("unexpected `:`")),
			SegmentToken::Word(word) => field.words.push(word),
		}
	}

	let mut path = None;
	let mut segment = None;
	for field in fields {
		let value = field.words.join(" ");
		match field.key {
			Some("file") if !value.is_empty() => path = Some(value),
			Some("segment") if !value.is_empty() => segment = Some(value),
			Some("file" | "segment") => return Err(malformed("empty field value")),
			Some(other) => return Err(malformed(&format!("unknown field `{other}`"))),
			None if value.is_empty() => {}
			None => return Err(malformed("expected `key: value`")),
		}
	}

	match (path, segment) {
		(Some(path), Some(segment)) => Ok(Directive::IncludeCodeSegment { path, segment }),
		(None, _) => Err(malformed("missing `file` field")),
		(_, None) => Err(malformed("missing `segment` field")),
	}
}
