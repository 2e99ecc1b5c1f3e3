use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Build the documentation site content from Ballerina Integrator guides.",
	long_about = "docgen copies the guide sources into a temporary working directory, inlines the \
	              code referenced by `INCLUDE_CODE`, `INCLUDE_CODE_SEGMENT` and `INCLUDE_MD` \
	              directives, adds front matter, archives every Ballerina project and publishes \
	              the result to `target/mkdocs-content`.\n\nSettings are read from `docgen.toml` \
	              in the project directory when present."
)]
pub struct DocgenCli {
	/// Path to the project directory. Defaults to the current directory.
	pub path: Option<PathBuf>,
}
