use std::fmt::Display;
use std::path::Path;

use crate::DocgenResult;
use crate::directive::HEADING_MARKER;
use crate::directive::image_url;

pub const FRONT_MATTER_SIGN: &str = "---";
pub const NOTE: &str = "note: This is an auto-generated file do not edit this, You can edit content \
                        in \"ballerina-integrator\" repo";

/// Fence language inferred from a source file's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeLanguage {
	Ballerina,
	Java,
	Plain,
}

impl CodeLanguage {
	pub fn from_path(path: &Path) -> Self {
		match path.extension().and_then(|ext| ext.to_str()) {
			Some("bal") => Self::Ballerina,
			Some("java") => Self::Java,
			_ => Self::Plain,
		}
	}

	/// The info string placed after the opening fence.
	pub fn tag(self) -> &'static str {
		match self {
			Self::Ballerina => "ballerina",
			Self::Java => "java",
			Self::Plain => "",
		}
	}
}

impl Display for CodeLanguage {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.tag())
	}
}

/// Wrap code in a fenced block tagged with the language of `path`.
pub fn format_code_block(path: &Path, code: &str) -> String {
	let lang = CodeLanguage::from_path(path);
	format!("```{lang}\n{code}\n```")
}

/// The leading whitespace of a line.
pub fn leading_whitespace(line: &str) -> &str {
	&line[..line.len() - line.trim_start().len()]
}

/// Indent a substituted block to the column of the directive it replaces:
/// the block is prefixed with the line's leading whitespace and the same
/// whitespace follows every newline inside it.
pub fn align_to_line(line: &str, block: &str) -> String {
	let indent = leading_whitespace(line);
	if indent.is_empty() {
		return block.to_string();
	}

	format!("{indent}{}", block.replace('\n', &format!("\n{indent}")))
}

/// Build the front matter block for a document from its heading line.
pub fn front_matter(heading_line: &str, commit_hash: &str) -> String {
	let title = heading_line.replace(HEADING_MARKER, "");
	let title = title.trim();

	[
		FRONT_MATTER_SIGN.to_string(),
		format!("title: {title}"),
		format!("commitHash: {commit_hash}"),
		NOTE.to_string(),
		FRONT_MATTER_SIGN.to_string(),
	]
	.join("\n")
}

/// Prefix the url of an image attachment with `../` so it resolves from the
/// generated page's directory.
pub fn rewrite_image_attachment(line: &str) -> DocgenResult<String> {
	let url = image_url(line)?;
	Ok(line.replace(&url, &format!("../{url}")))
}
