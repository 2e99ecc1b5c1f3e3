use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum DocgenError {
	#[error(transparent)]
	#[diagnostic(code(docgen::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to {action} `{path}`")]
	#[diagnostic(code(docgen::file_operation))]
	FileOperation {
		action: &'static str,
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("included file `{include}` does not exist (referenced from `{document}`)")]
	#[diagnostic(
		code(docgen::missing_include),
		help("include paths are relative to the directory of the referencing README.md")
	)]
	MissingIncludeFile { include: String, document: String },

	#[error("malformed directive `{line}`: {reason}")]
	#[diagnostic(
		code(docgen::malformed_directive),
		help("expected `<!-- INCLUDE_CODE_SEGMENT: {{file: <path>, segment: <name>}} -->`")
	)]
	MalformedDirective { line: String, reason: String },

	#[error("image attachment has no url: `{0}`")]
	#[diagnostic(code(docgen::malformed_image))]
	MalformedImageAttachment(String),

	#[error("code segment `{segment}` not found in `{file}`")]
	#[diagnostic(
		code(docgen::missing_segment),
		help(
			"wrap the code with `// CODE-SEGMENT-BEGIN: {segment}` and `// CODE-SEGMENT-END: \
			 {segment}`"
		)
	)]
	MissingSegment { segment: String, file: String },

	#[error("code segment `{segment}` is marked more than once in `{file}`")]
	#[diagnostic(
		code(docgen::duplicate_segment),
		help("each segment name must have exactly one begin and one end marker")
	)]
	DuplicateSegment { segment: String, file: String },

	#[error("license header is not in the expected format in `{file}`")]
	#[diagnostic(
		code(docgen::missing_license_header),
		help("included source files must start with the license banner ending in `// under the License.`")
	)]
	MissingLicenseHeader { file: String },

	#[error("get-the-code template `{template}` is missing `{marker}`")]
	#[diagnostic(code(docgen::malformed_get_the_code))]
	MalformedGetTheCode { template: String, marker: String },

	#[error("module name not found for project `{project}`")]
	#[diagnostic(
		code(docgen::module_not_found),
		help("the project needs a `src/<module>` directory")
	)]
	ModuleNotFound { project: String },

	#[error("project `{project}` contains more than one module")]
	#[diagnostic(
		code(docgen::multiple_modules),
		help("guides that include the get-the-code template must have exactly one module")
	)]
	MultipleModules { project: String },

	#[error("commit id is missing from `{path}`")]
	#[diagnostic(
		code(docgen::missing_commit_hash),
		help("the version file must contain a `git.commit.id=<hash>` line")
	)]
	MissingCommitHash { path: String },

	#[error("version information could not be read from `{path}`")]
	#[diagnostic(code(docgen::version_file))]
	VersionFile {
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(docgen::config_parse),
		help("check that docgen.toml is valid TOML")
	)]
	ConfigParse(String),

	#[error("failed to archive project `{path}`: {reason}")]
	#[diagnostic(code(docgen::archive))]
	Archive { path: String, reason: String },
}

impl DocgenError {
	pub(crate) fn file_operation(
		action: &'static str,
		path: &std::path::Path,
	) -> impl FnOnce(std::io::Error) -> Self {
		let path = path.display().to_string();
		move |source| Self::FileOperation { action, path, source }
	}
}

pub type DocgenResult<T> = Result<T, DocgenError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
