use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use derive_more::Deref;
use derive_more::DerefMut;

use crate::BuildContext;
use crate::Directive;
use crate::DocgenError;
use crate::DocgenResult;
use crate::align_to_line;
use crate::extract_segment;
use crate::format_code_block;
use crate::front_matter;
use crate::parse_directive;
use crate::rewrite_image_attachment;
use crate::strip_license_header;
use crate::strip_segment_markers;

/// File name of the shared "get the code" section included by tutorials.
pub const GET_THE_CODE_TEMPLATE: &str = "tutorial-get-the-code.md";
pub const ZIP_NAME_PLACEHOLDER: &str = "<<<MD_FILE_NAME>>>";
pub const MODULE_NAME_PLACEHOLDER: &str = "<<<MODULE_NAME>>>";
/// Number of `../` segments in a get-the-code include at the default guide
/// depth. Only other depths get their download links adjusted.
pub const DEFAULT_GET_THE_CODE_DEPTH: usize = 4;

const DOWNLOAD_IMAGE_START: &str = "<img src=\"";
const DOWNLOAD_IMAGE_END: &str = "\" width=\"200\" alt=\"Download ZIP\">";
const DOWNLOAD_ANCHOR_START: &str = "<a href=\"";
const DOWNLOAD_ANCHOR_END: &str = "\">\n    <img src=\"";

/// A document held in memory as lines while it is rewritten.
#[derive(Debug, Clone, Deref, DerefMut)]
pub struct SourceDocument {
	path: PathBuf,
	#[deref]
	#[deref_mut]
	lines: Vec<String>,
	trailing_newline: bool,
}

impl SourceDocument {
	/// Read a document from disk.
	pub fn read(path: &Path) -> DocgenResult<Self> {
		let content =
			std::fs::read_to_string(path).map_err(DocgenError::file_operation("read", path))?;
		Ok(Self::from_content(path, &content))
	}

	/// Build a document from its content. Line endings are normalized to `\n`.
	pub fn from_content(path: &Path, content: &str) -> Self {
		let content = normalize_line_endings(content);
		let trailing_newline = content.ends_with('\n');
		let lines = content.lines().map(ToString::to_string).collect();

		Self {
			path: path.to_path_buf(),
			lines,
			trailing_newline,
		}
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// The directory include paths are resolved against.
	pub fn dir(&self) -> &Path {
		self.path.parent().unwrap_or_else(|| Path::new("."))
	}

	/// Reassemble the document content.
	pub fn content(&self) -> String {
		let mut content = self.lines.join("\n");
		if self.trailing_newline {
			content.push('\n');
		}
		content
	}

	/// Overwrite the backing file with the current content.
	pub fn write(&self) -> DocgenResult<()> {
		std::fs::write(&self.path, self.content())
			.map_err(DocgenError::file_operation("write", &self.path))
	}
}

/// Normalize CRLF line endings to LF.
pub fn normalize_line_endings(content: &str) -> String {
	if content.contains('\r') {
		content.replace("\r\n", "\n").replace('\r', "\n")
	} else {
		content.to_string()
	}
}

/// Resolve `.` and `..` components without touching the filesystem. A `..`
/// that would climb above the start of a relative path is kept.
pub fn normalize_path(path: &Path) -> PathBuf {
	let mut normalized = PathBuf::new();
	for component in path.components() {
		match component {
			Component::CurDir => {}
			Component::ParentDir => {
				let last = normalized.components().next_back();
				if matches!(last, Some(Component::Normal(_))) {
					normalized.pop();
				} else if !matches!(last, Some(Component::RootDir | Component::Prefix(_))) {
					normalized.push(component);
				}
			}
			_ => normalized.push(component),
		}
	}

	normalized
}

/// Resolve every directive in the document at `path` and write the result
/// back to the same file.
pub fn rewrite_document(path: &Path, ctx: &BuildContext) -> DocgenResult<()> {
	tracing::debug!(document = %ctx.display_path(path), "rewriting document");
	let mut document = SourceDocument::read(path)?;
	rewrite_lines(&mut document, ctx)?;
	document.write()
}

/// Resolve every directive of an in-memory document.
pub fn rewrite_lines(document: &mut SourceDocument, ctx: &BuildContext) -> DocgenResult<()> {
	let rewriter = LineRewriter {
		document: document.path().to_path_buf(),
		dir: document.dir().to_path_buf(),
		ctx,
	};

	for (index, line) in document.iter_mut().enumerate() {
		if let Some(replacement) = rewriter.rewrite_line(line, index + 1)? {
			*line = replacement;
		}
	}

	Ok(())
}

struct LineRewriter<'a> {
	document: PathBuf,
	dir: PathBuf,
	ctx: &'a BuildContext,
}

impl LineRewriter<'_> {
	/// The replacement for a line, or `None` when it stays as is.
	fn rewrite_line(&self, line: &str, line_number: usize) -> DocgenResult<Option<String>> {
		let replacement = match parse_directive(line, line_number)? {
			Directive::IncludeCode { path } => {
				let (file, content) = self.read_include(&path)?;
				let code = strip_license_header(&content, &self.ctx.display_path(&file))?;
				let code = strip_segment_markers(code);
				align_to_line(line, &format_code_block(&file, code.trim()))
			}
			Directive::IncludeCodeSegment { path, segment } => {
				let (file, content) = self.read_include(&path)?;
				let display = self.ctx.display_path(&file);
				let code = strip_license_header(&content, &display)?;
				let code = strip_segment_markers(extract_segment(code, &segment, &display)?);
				align_to_line(line, &format_code_block(&file, code.trim()))
			}
			Directive::FrontMatter { heading } => front_matter(&heading, &self.ctx.commit_hash),
			Directive::ImageAttachment { .. } => rewrite_image_attachment(line)?,
			Directive::IncludeMarkdown { path } => {
				let (file, content) = self.read_include(&path)?;
				let content = content.trim();
				if file.to_string_lossy().contains(GET_THE_CODE_TEMPLATE) {
					self.rewrite_get_the_code(content, &path, &file)?
				} else {
					content.to_string()
				}
			}
			Directive::Plain => return Ok(None),
		};

		Ok(Some(replacement))
	}

	/// Read a file referenced by a directive, relative to the document.
	fn read_include(&self, include: &str) -> DocgenResult<(PathBuf, String)> {
		let file = normalize_path(&self.dir.join(include.trim_start_matches('/')));
		if !file.is_file() {
			return Err(DocgenError::MissingIncludeFile {
				include: self.ctx.display_path(&file),
				document: self.ctx.display_path(&self.document),
			});
		}

		let content =
			std::fs::read_to_string(&file).map_err(DocgenError::file_operation("read", &file))?;
		Ok((file, normalize_line_endings(&content)))
	}

	/// Fill in the project specific parts of the get-the-code template.
	fn rewrite_get_the_code(
		&self,
		content: &str,
		include: &str,
		template: &Path,
	) -> DocgenResult<String> {
		let zip_name = self
			.dir
			.file_name()
			.map(|name| name.to_string_lossy().to_string())
			.unwrap_or_default();
		let content = content.replace(ZIP_NAME_PLACEHOLDER, &zip_name);
		let depth = include.matches("../").count();
		let content = adjust_download_paths(&content, depth, &self.ctx.display_path(template))?;
		let module = find_module_name(&self.dir, self.ctx)?;

		Ok(content.replace(MODULE_NAME_PLACEHOLDER, &module))
	}
}

/// Add the `../` segments a non-default include depth needs to the download
/// image and anchor paths of a get-the-code template.
///
/// Only depths above the default get extra segments; shallower includes keep
/// the template paths unchanged.
pub fn adjust_download_paths(content: &str, depth: usize, template: &str) -> DocgenResult<String> {
	if depth == DEFAULT_GET_THE_CODE_DEPTH {
		return Ok(content.to_string());
	}

	let malformed = |marker: &str| {
		DocgenError::MalformedGetTheCode {
			template: template.to_string(),
			marker: marker.to_string(),
		}
	};
	let extra = depth.saturating_sub(DEFAULT_GET_THE_CODE_DEPTH);

	let image_path = string_between(content, DOWNLOAD_IMAGE_START, DOWNLOAD_IMAGE_END)
		.ok_or_else(|| malformed(DOWNLOAD_IMAGE_END))?
		.to_string();
	let mut content = content.to_string();
	if extra > 0 && !image_path.is_empty() {
		content = content.replace(&image_path, &add_parent_dirs(&image_path, extra));
	}

	let anchor_path = string_between(&content, DOWNLOAD_ANCHOR_START, DOWNLOAD_ANCHOR_END)
		.ok_or_else(|| malformed(DOWNLOAD_ANCHOR_END))?
		.to_string();
	if extra > 0 && !anchor_path.is_empty() {
		content = content.replace(&anchor_path, &add_parent_dirs(&anchor_path, extra));
	}

	Ok(content)
}

/// The text between the first `start` and the next `end` after it.
fn string_between<'a>(haystack: &'a str, start: &str, end: &str) -> Option<&'a str> {
	let (_, after) = haystack.split_once(start)?;
	let (between, _) = after.split_once(end)?;
	Some(between)
}

/// Prefix `path` with `count` parent directory segments.
pub fn add_parent_dirs(path: &str, count: usize) -> String {
	format!("{}{path}", "../".repeat(count))
}

/// The name of the single module directory under `<project>/src`.
pub fn find_module_name(project: &Path, ctx: &BuildContext) -> DocgenResult<String> {
	let src = project.join("src");
	let not_found = || {
		DocgenError::ModuleNotFound {
			project: ctx.display_path(&src),
		}
	};

	let entries = std::fs::read_dir(&src).map_err(|_| not_found())?;
	let mut modules = Vec::new();
	for entry in entries {
		let path = entry?.path();
		if path.is_dir() {
			modules.push(path);
		}
	}

	match modules.as_slice() {
		[module] => {
			Ok(module
				.file_name()
				.map(|name| name.to_string_lossy().to_string())
				.unwrap_or_default())
		}
		[] => Err(not_found()),
		_ => {
			Err(DocgenError::MultipleModules {
				project: ctx.display_path(&src),
			})
		}
	}
}
