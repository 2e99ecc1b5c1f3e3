use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn docgen_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("docgen"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("RUST_LOG");
	cmd
}

pub const LICENSE_HEADER: &str = "// Copyright (c) 2019 WSO2 Inc. (http://www.wso2.org) All Rights \
                                  Reserved.\n//\n// Licensed under the Apache License, Version \
                                  2.0.\n// See the License for the specific language governing \
                                  permissions and limitations\n// under the License.\n";

/// Write `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) -> std::io::Result<()> {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent)?;
	}
	std::fs::write(path, content)
}

/// A project with a version file and a `docgen.toml` pointing at `src`.
pub fn project() -> std::io::Result<tempfile::TempDir> {
	let tmp = tempfile::tempdir()?;
	write_file(tmp.path(), "git.properties", "git.commit.id=0123abcd\n")?;
	write_file(tmp.path(), "docgen.toml", "source = \"src\"\n")?;
	Ok(tmp)
}
