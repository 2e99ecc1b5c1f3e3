//! `docgen_core` turns a tree of markdown guides into the content directory of
//! the Ballerina Integrator documentation site. Guides reference source code
//! through HTML comment directives; the pipeline inlines that code, adds
//! front matter and publishes the result.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Source tree
//!   -> working copy in a temporary directory under the target directory
//!   -> Tree walker (README.md files, project manifests, source files)
//!   -> Document rewriter (one line at a time)
//!   -> Directive parser (classifies the line)
//!   -> Segment extractor / license stripper / formatter / front matter
//!   -> Project archives, pruning, empty directory removal
//!   -> Content directory (and optional website directory)
//! ```
//!
//! ## Directives
//!
//! ```markdown
//! <!-- INCLUDE_CODE: src/guide/main.bal -->
//! <!-- INCLUDE_CODE_SEGMENT: {file: src/guide/main.bal, segment: segment_1} -->
//! <!-- INCLUDE_MD: ../../../../tutorial-get-the-code.md -->
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! let report = docgen_core::build_project(Path::new(".")).unwrap();
//! println!("{} documents rewritten", report.documents_rewritten);
//! ```

pub use config::*;
pub use directive::*;
pub use error::*;
pub use format::*;
pub use rewriter::*;
pub use segment::*;
pub use site::*;
pub use walker::*;

pub mod config;
mod directive;
#[allow(unused_assignments)]
mod error;
mod format;
mod rewriter;
mod segment;
mod site;
mod walker;

#[cfg(test)]
mod __fixtures;
