use std::path::Path;
use std::path::PathBuf;

use globset::Glob;
use globset::GlobSet;
use globset::GlobSetBuilder;
use serde::Deserialize;

use crate::DocgenError;
use crate::DocgenResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["docgen.toml", ".docgen.toml", ".config/docgen.toml"];

/// Key of the commit id entry written by the git-commit-id plugin.
pub const GIT_COMMIT_ID: &str = "git.commit.id";

/// Name of the content directory consumed by the static site generator.
pub const CONTENT_DIR_NAME: &str = "mkdocs-content";

/// Prefix of the temporary working copy created inside the target directory.
pub const WORK_DIR_PREFIX: &str = "tempDirectory";

/// How processed `README.md` files are renamed.
///
/// ```toml
/// index_naming = { fixed = "1.md" }
/// # or
/// index_naming = "parent_directory"
/// ```
#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum IndexNaming {
	/// Every readme gets the same file name.
	Fixed(String),
	/// The readme is named after its parent directory (`<dir>/<dir>.md`).
	ParentDirectory,
}

impl Default for IndexNaming {
	fn default() -> Self {
		Self::Fixed("1.md".to_string())
	}
}

impl IndexNaming {
	/// The file name a readme inside `dir` is renamed to.
	pub fn file_name(&self, dir: &Path) -> String {
		match self {
			Self::Fixed(name) => name.clone(),
			Self::ParentDirectory => {
				let name = dir
					.file_name()
					.map(|name| name.to_string_lossy().to_string())
					.unwrap_or_default();
				format!("{name}.md")
			}
		}
	}
}

/// Configuration loaded from a `docgen.toml` file.
///
/// ```toml
/// source = "../content/src"
/// target = "target"
/// git_properties = "git.properties"
/// www = "../www"
/// index_naming = { fixed = "1.md" }
///
/// [exclude]
/// patterns = ["doc-generator/"]
///
/// [keep]
/// patterns = ["*.pdf"]
/// ```
#[derive(Debug, Deserialize)]
pub struct DocgenConfig {
	/// Documentation source tree, copied into the working directory.
	#[serde(default = "default_source")]
	pub source: PathBuf,
	/// Build output directory. Holds the working copy and the content
	/// directory.
	#[serde(default = "default_target")]
	pub target: PathBuf,
	/// Java properties file carrying the current commit id.
	#[serde(default = "default_git_properties")]
	pub git_properties: PathBuf,
	/// Optional website skeleton copied to `<target>/www`, with the generated
	/// content placed under its `docs` directory.
	#[serde(default)]
	pub www: Option<PathBuf>,
	/// File name of the documents that get processed.
	#[serde(default = "default_readme")]
	pub readme: String,
	/// File name marking a directory as a project to archive.
	#[serde(default = "default_manifest")]
	pub manifest: String,
	/// Markdown file name that is never published.
	#[serde(default = "default_module_doc")]
	pub module_doc: String,
	/// How processed readmes are renamed.
	#[serde(default)]
	pub index_naming: IndexNaming,
	/// Paths skipped when copying the source tree.
	#[serde(default)]
	pub exclude: ExcludeConfig,
	/// Extra files that survive pruning.
	#[serde(default)]
	pub keep: KeepConfig,
}

impl Default for DocgenConfig {
	fn default() -> Self {
		Self {
			source: default_source(),
			target: default_target(),
			git_properties: default_git_properties(),
			www: None,
			readme: default_readme(),
			manifest: default_manifest(),
			module_doc: default_module_doc(),
			index_naming: IndexNaming::default(),
			exclude: ExcludeConfig::default(),
			keep: KeepConfig::default(),
		}
	}
}

/// Gitignore-style patterns for source paths that never reach the working
/// copy.
#[derive(Debug, Deserialize)]
pub struct ExcludeConfig {
	#[serde(default)]
	pub patterns: Vec<String>,
}

impl Default for ExcludeConfig {
	fn default() -> Self {
		Self {
			patterns: vec!["doc-generator/".to_string()],
		}
	}
}

/// Glob patterns (matched against file names) for files kept by the prune
/// pass in addition to markdown, archives and images.
#[derive(Debug, Default, Deserialize)]
pub struct KeepConfig {
	#[serde(default)]
	pub patterns: Vec<String>,
}

fn default_source() -> PathBuf {
	PathBuf::from("../content/src")
}

fn default_target() -> PathBuf {
	PathBuf::from("target")
}

fn default_git_properties() -> PathBuf {
	PathBuf::from("git.properties")
}

fn default_readme() -> String {
	"README.md".to_string()
}

fn default_manifest() -> String {
	"Ballerina.toml".to_string()
}

fn default_module_doc() -> String {
	"Module.md".to_string()
}

impl DocgenConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`,
	/// falling back to defaults when there is none.
	pub fn load(root: &Path) -> DocgenResult<DocgenConfig> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(DocgenConfig::default());
		};

		let content = std::fs::read_to_string(&config_path)?;
		toml::from_str(&content).map_err(|e| DocgenError::ConfigParse(e.to_string()))
	}
}

/// Read the commit id from a `git.properties` file. The last matching line
/// wins.
pub fn read_commit_hash(path: &Path) -> DocgenResult<String> {
	let content = std::fs::read_to_string(path).map_err(|source| {
		DocgenError::VersionFile {
			path: path.display().to_string(),
			source,
		}
	})?;

	parse_commit_hash(&content).ok_or_else(|| {
		DocgenError::MissingCommitHash {
			path: path.display().to_string(),
		}
	})
}

/// Extract the commit id from java properties content.
pub fn parse_commit_hash(content: &str) -> Option<String> {
	let key = format!("{GIT_COMMIT_ID}=");
	content
		.lines()
		.rev()
		.find(|line| line.contains(&key))
		.map(|line| line.replace(&key, "").trim().to_string())
}

/// Everything a build needs, resolved once at startup and passed by
/// reference through the pipeline.
#[derive(Debug, Clone)]
pub struct BuildContext {
	/// Commit id written into every front matter block.
	pub commit_hash: String,
	/// Documentation source tree.
	pub source_dir: PathBuf,
	/// Build output directory.
	pub target_dir: PathBuf,
	/// Root of the working copy being processed.
	pub work_dir: PathBuf,
	/// Website skeleton, if any.
	pub www_dir: Option<PathBuf>,
	pub readme: String,
	pub manifest: String,
	pub module_doc: String,
	pub index_naming: IndexNaming,
	pub exclude_patterns: Vec<String>,
	/// File name globs that survive pruning.
	pub keep_set: GlobSet,
}

impl BuildContext {
	/// Resolve a config against the project `root` and read the commit id.
	pub fn from_config(root: &Path, config: &DocgenConfig) -> DocgenResult<Self> {
		let commit_hash = read_commit_hash(&root.join(&config.git_properties))?;
		let target_dir = root.join(&config.target);

		Ok(Self {
			commit_hash,
			source_dir: root.join(&config.source),
			work_dir: target_dir.join(WORK_DIR_PREFIX),
			target_dir,
			www_dir: config.www.as_ref().map(|www| root.join(www)),
			readme: config.readme.clone(),
			manifest: config.manifest.clone(),
			module_doc: config.module_doc.clone(),
			index_naming: config.index_naming.clone(),
			exclude_patterns: config.exclude.patterns.clone(),
			keep_set: build_glob_set(&config.keep.patterns)?,
		})
	}

	/// Same context pointed at another working directory.
	#[must_use]
	pub fn with_work_dir(&self, work_dir: &Path) -> Self {
		Self {
			work_dir: work_dir.to_path_buf(),
			..self.clone()
		}
	}

	/// The directory the static site generator reads from.
	pub fn content_dir(&self) -> PathBuf {
		self.target_dir.join(CONTENT_DIR_NAME)
	}

	/// Directory holding the images that survive pruning.
	pub fn image_dir(&self) -> PathBuf {
		self.source_dir.join("assets").join("img")
	}

	/// Directory that receives project archives.
	pub fn zip_dir(&self) -> PathBuf {
		self.work_dir.join("assets").join("zip")
	}

	/// Show a working-copy path as the matching path in the source tree so
	/// errors point at files authors can edit.
	pub fn display_path(&self, path: &Path) -> String {
		match path.strip_prefix(&self.work_dir) {
			Ok(relative) => self.source_dir.join(relative).display().to_string(),
			Err(_) => path.display().to_string(),
		}
	}
}

/// Build a `GlobSet` from a list of glob pattern strings.
fn build_glob_set(patterns: &[String]) -> DocgenResult<GlobSet> {
	let mut builder = GlobSetBuilder::new();
	for pattern in patterns {
		let glob = Glob::new(pattern).map_err(|e| {
			DocgenError::ConfigParse(format!("invalid keep pattern `{pattern}`: {e}"))
		})?;
		builder.add(glob);
	}
	builder
		.build()
		.map_err(|e| DocgenError::ConfigParse(format!("failed to build keep rules: {e}")))
}
