use std::path::Path;
use std::path::PathBuf;

use crate::BuildContext;
use crate::DocgenConfig;

pub const LICENSE_HEADER: &str = "// Copyright (c) 2019 WSO2 Inc. (http://www.wso2.org) All Rights Reserved.
//
// WSO2 Inc. licenses this file to you under the Apache License,
// Version 2.0 (the \"License\"); you may not use this file except
// in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// \"AS IS\" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.
";

pub const COMMIT_HASH: &str = "4f2d8c1e9a7b";

pub const GET_THE_CODE: &str = "## Get the code

Download the ZIP for <<<MD_FILE_NAME>>> with module <<<MODULE_NAME>>>.

<a href=\"../../../../assets/zip/<<<MD_FILE_NAME>>>.zip\">
    <img src=\"../../../../assets/img/download-zip.png\" width=\"200\" alt=\"Download ZIP\">
</a>
";

/// A source file body prefixed with the license banner.
pub fn licensed(code: &str) -> String {
	format!("{LICENSE_HEADER}\n{code}\n")
}

/// Write `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create_dir_all: {e}"));
	}
	std::fs::write(&path, content).unwrap_or_else(|e| panic!("write: {e}"));
	path
}

pub fn read_file(path: &Path) -> String {
	std::fs::read_to_string(path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}

/// A project root with a `git.properties` file and an empty `src` tree.
pub fn project_root() -> tempfile::TempDir {
	let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	write_file(
		tmp.path(),
		"git.properties",
		&format!("#Generated by Git-Commit-Id-Plugin\ngit.branch=master\ngit.commit.id={COMMIT_HASH}\n"),
	);
	std::fs::create_dir_all(tmp.path().join("src")).unwrap_or_else(|e| panic!("mkdir: {e}"));
	tmp
}

pub fn test_config() -> DocgenConfig {
	DocgenConfig {
		source: PathBuf::from("src"),
		..DocgenConfig::default()
	}
}

/// A context whose source and working directory are both `root/src`.
pub fn test_context(root: &Path) -> BuildContext {
	let ctx = BuildContext::from_config(root, &test_config())
		.unwrap_or_else(|e| panic!("context: {e}"));
	ctx.with_work_dir(&root.join("src"))
}
