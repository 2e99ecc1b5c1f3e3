mod common;

use docgen_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;

#[test]
fn build_generates_content() -> AnyEmptyResult {
	let tmp = common::project()?;
	common::write_file(
		tmp.path(),
		"src/guide/README.md",
		"# Hello Service\n<!-- INCLUDE_CODE: hello.bal -->\n",
	)?;
	common::write_file(
		tmp.path(),
		"src/guide/hello.bal",
		&format!("{}\nservice hello {{}}\n", common::LICENSE_HEADER),
	)?;

	common::docgen_cmd()
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Documentation content generated."))
		.stdout(predicates::str::contains("Documents rewritten"));

	let document =
		std::fs::read_to_string(tmp.path().join("target/mkdocs-content/guide/1.md"))?;
	similar_asserts::assert_eq!(
		document,
		"---\ntitle: Hello Service\ncommitHash: 0123abcd\nnote: This is an auto-generated file do \
		 not edit this, You can edit content in \"ballerina-integrator\" repo\n---\n```ballerina\nservice \
		 hello {}\n```\n"
	);

	Ok(())
}

#[test]
fn build_logs_pipeline_stages() -> AnyEmptyResult {
	let tmp = common::project()?;
	common::write_file(tmp.path(), "src/guide/README.md", "# Guide\n")?;

	common::docgen_cmd()
		.arg(tmp.path())
		.assert()
		.success()
		.stderr(predicates::str::contains("processing documents"))
		.stderr(predicates::str::contains("publishing content"));

	Ok(())
}

#[test]
fn build_fails_on_missing_segment() -> AnyEmptyResult {
	let tmp = common::project()?;
	common::write_file(
		tmp.path(),
		"src/guide/README.md",
		"<!-- INCLUDE_CODE_SEGMENT: {file: hello.bal, segment: missing_segment} -->\n",
	)?;
	common::write_file(
		tmp.path(),
		"src/guide/hello.bal",
		&format!("{}\nservice hello {{}}\n", common::LICENSE_HEADER),
	)?;

	common::docgen_cmd()
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("missing_segment"))
		.stdout(predicates::str::contains("Documentation content generated.").not());

	Ok(())
}

#[test]
fn build_fails_without_version_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(tmp.path(), "docgen.toml", "source = \"src\"\n")?;
	common::write_file(tmp.path(), "src/guide/README.md", "# Guide\n")?;

	common::docgen_cmd()
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("git.properties"));

	Ok(())
}

#[test]
fn build_fails_on_invalid_config() -> AnyEmptyResult {
	let tmp = common::project()?;
	common::write_file(tmp.path(), "docgen.toml", "source = [")?;

	common::docgen_cmd()
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("failed to parse config file"));

	Ok(())
}

#[test]
fn build_uses_current_directory_by_default() -> AnyEmptyResult {
	let tmp = common::project()?;
	common::write_file(tmp.path(), "src/guide/README.md", "# Guide\n")?;

	common::docgen_cmd().current_dir(tmp.path()).assert().success();
	assert!(tmp.path().join("target/mkdocs-content/guide/1.md").is_file());

	Ok(())
}

#[test]
fn help_describes_usage() -> AnyEmptyResult {
	common::docgen_cmd()
		.arg("--help")
		.assert()
		.success()
		.stdout(predicates::str::contains("docgen copies the guide sources"));

	Ok(())
}
