use std::path::Path;

use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;
use walkdir::WalkDir;

use crate::BuildContext;
use crate::DocgenConfig;
use crate::DocgenError;
use crate::DocgenResult;
use crate::WORK_DIR_PREFIX;
use crate::archive_projects;
use crate::process_directory;
use crate::prune_unwanted_files;
use crate::remove_empty_directories;

/// Name of the website directory created inside the target directory.
pub const WWW_DIR_NAME: &str = "www";
/// Directory of the website that receives the generated content.
pub const WWW_DOCS_DIR_NAME: &str = "docs";

/// What a build did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
	pub documents_rewritten: usize,
	pub sources_cleaned: usize,
	pub projects_archived: usize,
	pub files_pruned: usize,
	pub directories_removed: usize,
	pub files_published: usize,
}

/// Load the configuration of the project at `root` and build its site.
pub fn build_project(root: &Path) -> DocgenResult<BuildReport> {
	let config = DocgenConfig::load(root)?;
	let ctx = BuildContext::from_config(root, &config)?;
	build_site(&ctx)
}

/// Run the whole pipeline against a temporary working copy of the source
/// tree and publish the result to the content directory.
///
/// The working copy is removed whether or not the build succeeds.
pub fn build_site(ctx: &BuildContext) -> DocgenResult<BuildReport> {
	let content_dir = ctx.content_dir();
	if content_dir.exists() {
		tracing::info!(dir = %content_dir.display(), "removing previous content directory");
		std::fs::remove_dir_all(&content_dir)
			.map_err(DocgenError::file_operation("delete", &content_dir))?;
	}

	create_directory(&ctx.target_dir)?;
	let work_dir = tempfile::Builder::new()
		.prefix(WORK_DIR_PREFIX)
		.tempdir_in(&ctx.target_dir)
		.map_err(DocgenError::file_operation("create", &ctx.target_dir))?;
	create_directory(&content_dir)?;

	let ctx = ctx.with_work_dir(work_dir.path());
	let report = run_pipeline(&ctx)?;

	work_dir
		.close()
		.map_err(DocgenError::file_operation("delete", &ctx.work_dir))?;
	Ok(report)
}

fn run_pipeline(ctx: &BuildContext) -> DocgenResult<BuildReport> {
	let mut report = BuildReport::default();

	tracing::info!(source = %ctx.source_dir.display(), "copying source tree");
	if !ctx.source_dir.is_dir() {
		return Err(DocgenError::FileOperation {
			action: "read",
			path: ctx.source_dir.display().to_string(),
			source: std::io::ErrorKind::NotFound.into(),
		});
	}
	let exclude = build_exclude_matcher(&ctx.source_dir, &ctx.exclude_patterns)?;
	copy_dir(&ctx.source_dir, &ctx.work_dir, &exclude)?;

	tracing::info!("processing documents");
	let manifests = process_directory(&ctx.work_dir, ctx, &mut report)?;

	tracing::info!(projects = manifests.len(), "archiving projects");
	archive_projects(&manifests, ctx, &mut report)?;

	tracing::info!("pruning unpublished files");
	prune_unwanted_files(&ctx.work_dir, ctx, &mut report)?;

	tracing::info!("removing empty directories");
	remove_empty_directories(&ctx.work_dir, &mut report)?;

	let content_dir = ctx.content_dir();
	tracing::info!(dir = %content_dir.display(), "publishing content");
	report.files_published = copy_dir(&ctx.work_dir, &content_dir, &Gitignore::empty())?;

	if let Some(www) = &ctx.www_dir {
		publish_website(www, &content_dir, ctx)?;
	}

	Ok(report)
}

/// Copy the website skeleton to `<target>/www` and the generated content into
/// its docs directory.
fn publish_website(www: &Path, content_dir: &Path, ctx: &BuildContext) -> DocgenResult<()> {
	let www_out = ctx.target_dir.join(WWW_DIR_NAME);
	tracing::info!(dir = %www_out.display(), "publishing website");
	if www_out.exists() {
		std::fs::remove_dir_all(&www_out).map_err(DocgenError::file_operation("delete", &www_out))?;
	}

	create_directory(&www_out)?;
	copy_dir(www, &www_out, &Gitignore::empty())?;
	copy_dir(content_dir, &www_out.join(WWW_DOCS_DIR_NAME), &Gitignore::empty())?;

	Ok(())
}

/// Create a directory and its parents, logging when it is already there.
pub fn create_directory(dir: &Path) -> DocgenResult<()> {
	if dir.is_dir() {
		tracing::info!(dir = %dir.display(), "Directory already exists");
		return Ok(());
	}

	std::fs::create_dir_all(dir).map_err(DocgenError::file_operation("create", dir))
}

/// Copy the contents of `from` into `to`, skipping excluded entries. Returns
/// the number of files copied.
pub fn copy_dir(from: &Path, to: &Path, exclude: &Gitignore) -> DocgenResult<usize> {
	let walker = WalkDir::new(from)
		.sort_by_file_name()
		.into_iter()
		.filter_entry(|entry| {
			!exclude
				.matched(entry.path(), entry.file_type().is_dir())
				.is_ignore()
		});

	let mut copied = 0;
	for entry in walker {
		let entry = entry.map_err(|e| {
			DocgenError::FileOperation {
				action: "copy",
				path: from.display().to_string(),
				source: e.into(),
			}
		})?;
		let Ok(relative) = entry.path().strip_prefix(from) else {
			continue;
		};
		let destination = to.join(relative);

		if entry.file_type().is_dir() {
			std::fs::create_dir_all(&destination)
				.map_err(DocgenError::file_operation("create", &destination))?;
		} else {
			std::fs::copy(entry.path(), &destination)
				.map_err(DocgenError::file_operation("copy", entry.path()))?;
			copied += 1;
		}
	}

	Ok(copied)
}

/// Build a `Gitignore` matcher from the `[exclude]` patterns in
/// `docgen.toml`.
fn build_exclude_matcher(root: &Path, patterns: &[String]) -> DocgenResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder.add_line(None, pattern).map_err(|e| {
			DocgenError::ConfigParse(format!("invalid exclude pattern `{pattern}`: {e}"))
		})?;
	}
	builder
		.build()
		.map_err(|e| DocgenError::ConfigParse(format!("failed to build exclude rules: {e}")))
}
