use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::BuildContext;
use crate::BuildReport;
use crate::DocgenError;
use crate::DocgenResult;
use crate::rewrite_document;
use crate::strip_segment_markers;

/// What the walker does with a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
	/// A document that gets rewritten and renamed.
	Readme,
	/// A project manifest. Its directory is archived after the walk.
	ProjectManifest,
	/// Source code with segment markers to strip.
	SourceCode,
	Other,
	Subdirectory,
}

/// Classify a directory entry.
pub fn classify(path: &Path, ctx: &BuildContext) -> EntryKind {
	if path.is_dir() {
		return EntryKind::Subdirectory;
	}

	let name = path.file_name().and_then(|name| name.to_str());
	if name == Some(ctx.readme.as_str()) {
		return EntryKind::Readme;
	}
	if name == Some(ctx.manifest.as_str()) {
		return EntryKind::ProjectManifest;
	}
	if is_source_file(path) {
		return EntryKind::SourceCode;
	}

	EntryKind::Other
}

fn is_source_file(path: &Path) -> bool {
	matches!(
		path.extension().and_then(|ext| ext.to_str()),
		Some("bal" | "java")
	)
}

/// Files found by the document pass that are handled after it.
#[derive(Debug, Default)]
struct WalkTargets {
	manifests: Vec<PathBuf>,
	sources: Vec<PathBuf>,
}

/// Rewrite every readme below `dir`, then strip segment markers from the
/// source files, and return the project manifests found along the way.
///
/// Sources are only cleaned once every document has been rewritten, so
/// includes always read the marked-up files. Readmes directly inside `dir`
/// keep their name.
pub fn process_directory(
	dir: &Path,
	ctx: &BuildContext,
	report: &mut BuildReport,
) -> DocgenResult<Vec<PathBuf>> {
	let mut targets = WalkTargets::default();
	walk_directory(dir, ctx, report, &mut targets, true)?;

	for source in &targets.sources {
		strip_source_markers(source)?;
		report.sources_cleaned += 1;
	}

	Ok(targets.manifests)
}

fn walk_directory(
	dir: &Path,
	ctx: &BuildContext,
	report: &mut BuildReport,
	targets: &mut WalkTargets,
	is_root: bool,
) -> DocgenResult<()> {
	for path in sorted_entries(dir)? {
		match classify(&path, ctx) {
			EntryKind::Subdirectory => walk_directory(&path, ctx, report, targets, false)?,
			EntryKind::Readme => {
				rewrite_document(&path, ctx)?;
				report.documents_rewritten += 1;
				if !is_root {
					rename_readme(&path, dir, ctx)?;
				}
			}
			EntryKind::ProjectManifest => targets.manifests.push(path),
			EntryKind::SourceCode => targets.sources.push(path),
			EntryKind::Other => {}
		}
	}

	Ok(())
}

/// Entries of `dir`, sorted for deterministic processing.
fn sorted_entries(dir: &Path) -> DocgenResult<Vec<PathBuf>> {
	let mut paths = Vec::new();
	for entry in std::fs::read_dir(dir).map_err(DocgenError::file_operation("list", dir))? {
		paths.push(entry?.path());
	}
	paths.sort();

	Ok(paths)
}

fn rename_readme(path: &Path, dir: &Path, ctx: &BuildContext) -> DocgenResult<()> {
	let renamed = dir.join(ctx.index_naming.file_name(dir));
	tracing::debug!(from = %path.display(), to = %renamed.display(), "renaming document");
	std::fs::rename(path, &renamed).map_err(DocgenError::file_operation("rename", path))
}

fn strip_source_markers(path: &Path) -> DocgenResult<()> {
	let content =
		std::fs::read_to_string(path).map_err(DocgenError::file_operation("read", path))?;
	std::fs::write(path, strip_segment_markers(&content))
		.map_err(DocgenError::file_operation("write", path))
}

/// Archive every project. Two projects with the same directory name would
/// share an archive, so that is an error.
pub fn archive_projects(
	manifests: &[PathBuf],
	ctx: &BuildContext,
	report: &mut BuildReport,
) -> DocgenResult<()> {
	let mut archived: BTreeMap<String, &Path> = BTreeMap::new();
	for manifest in manifests {
		let project = manifest.parent().unwrap_or(manifest);
		let name = project
			.file_name()
			.map(|name| name.to_string_lossy().to_string())
			.unwrap_or_default();

		if let Some(existing) = archived.get(&name) {
			return Err(DocgenError::Archive {
				path: ctx.zip_dir().join(format!("{name}.zip")).display().to_string(),
				reason: format!(
					"projects `{}` and `{}` have the same name",
					ctx.display_path(existing),
					ctx.display_path(project)
				),
			});
		}

		archive_project(manifest, ctx)?;
		archived.insert(name, project);
		report.projects_archived += 1;
	}

	Ok(())
}

/// Zip the directory holding `manifest` into `<work>/assets/zip/<name>.zip`.
/// Entry names start with the directory name.
pub fn archive_project(manifest: &Path, ctx: &BuildContext) -> DocgenResult<PathBuf> {
	let Some(project) = manifest.parent() else {
		return Err(DocgenError::Archive {
			path: manifest.display().to_string(),
			reason: "manifest has no parent directory".to_string(),
		});
	};
	let base = project.parent().unwrap_or(project);
	let name = project
		.file_name()
		.map(|name| name.to_string_lossy().to_string())
		.unwrap_or_default();

	let zip_dir = ctx.zip_dir();
	std::fs::create_dir_all(&zip_dir).map_err(DocgenError::file_operation("create", &zip_dir))?;
	let zip_path = zip_dir.join(format!("{name}.zip"));
	tracing::debug!(project = %ctx.display_path(project), archive = %zip_path.display(), "archiving project");

	let archive_error = |reason: String| {
		DocgenError::Archive {
			path: zip_path.display().to_string(),
			reason,
		}
	};
	let file = File::create(&zip_path).map_err(DocgenError::file_operation("create", &zip_path))?;
	let mut writer = ZipWriter::new(file);
	let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

	for entry in WalkDir::new(project).sort_by_file_name() {
		let entry = entry.map_err(|e| archive_error(e.to_string()))?;
		let Ok(relative) = entry.path().strip_prefix(base) else {
			continue;
		};
		let entry_name = relative.to_string_lossy().replace('\\', "/");

		if entry.file_type().is_dir() {
			writer
				.add_directory(entry_name, options)
				.map_err(|e| archive_error(e.to_string()))?;
		} else {
			let bytes = std::fs::read(entry.path())
				.map_err(DocgenError::file_operation("read", entry.path()))?;
			writer
				.start_file(entry_name, options)
				.map_err(|e| archive_error(e.to_string()))?;
			writer.write_all(&bytes)?;
		}
	}

	writer.finish().map_err(|e| archive_error(e.to_string()))?;
	Ok(zip_path)
}

/// Delete every file below `dir` that is not published.
pub fn prune_unwanted_files(
	dir: &Path,
	ctx: &BuildContext,
	report: &mut BuildReport,
) -> DocgenResult<()> {
	for path in sorted_entries(dir)? {
		if path.is_dir() {
			prune_unwanted_files(&path, ctx, report)?;
		} else if !is_published_file(&path, ctx) {
			tracing::debug!(file = %path.display(), "pruning file");
			std::fs::remove_file(&path).map_err(DocgenError::file_operation("delete", &path))?;
			report.files_pruned += 1;
		}
	}

	Ok(())
}

/// Markdown other than module docs, archives, known images and files matching
/// a keep pattern are published.
pub fn is_published_file(path: &Path, ctx: &BuildContext) -> bool {
	let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
		return false;
	};
	let extension = path.extension().and_then(|ext| ext.to_str());

	let markdown = extension == Some("md") && name != ctx.module_doc;
	let archive = extension == Some("zip");
	let image = ctx.image_dir().join(name).exists();

	markdown || archive || image || ctx.keep_set.is_match(name)
}

/// Remove empty directories below `root`. Each removal climbs to the parent
/// and removes it too once it becomes empty; `root` itself is never removed.
pub fn remove_empty_directories(root: &Path, report: &mut BuildReport) -> DocgenResult<()> {
	remove_empty_below(root, root, report)
}

fn remove_empty_below(dir: &Path, root: &Path, report: &mut BuildReport) -> DocgenResult<()> {
	for path in sorted_entries(dir)? {
		if !path.is_dir() {
			continue;
		}

		remove_with_empty_parents(&path, root, report)?;
		if path.is_dir() {
			remove_empty_below(&path, root, report)?;
		}
	}

	Ok(())
}

fn remove_with_empty_parents(
	dir: &Path,
	root: &Path,
	report: &mut BuildReport,
) -> DocgenResult<()> {
	let mut current = Some(dir);
	while let Some(dir) = current {
		if dir == root || !dir.starts_with(root) || !dir.is_dir() || !is_empty_dir(dir)? {
			break;
		}

		tracing::debug!(dir = %dir.display(), "removing empty directory");
		std::fs::remove_dir(dir).map_err(DocgenError::file_operation("delete", dir))?;
		report.directories_removed += 1;
		current = dir.parent();
	}

	Ok(())
}

fn is_empty_dir(dir: &Path) -> DocgenResult<bool> {
	let mut entries = std::fs::read_dir(dir).map_err(DocgenError::file_operation("list", dir))?;
	Ok(entries.next().is_none())
}
