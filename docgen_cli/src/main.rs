use std::path::PathBuf;
use std::process;

use clap::Parser;
use docgen_cli::DocgenCli;
use docgen_core::BuildReport;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = DocgenCli::parse();

	let use_color = std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
		)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.init();

	let root = resolve_root(&args);
	match docgen_core::build_project(&root) {
		Ok(report) => print_summary(&report),
		Err(e) => {
			let report: miette::Report = e.into();
			eprintln!("{report:?}");
			process::exit(1);
		}
	}
}

fn resolve_root(args: &DocgenCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn print_summary(report: &BuildReport) {
	println!("{}", colored!("Documentation content generated.", green));
	println!();
	println!("{}", colored!("Summary", bold));
	print_field("Documents rewritten", report.documents_rewritten);
	print_field("Source files cleaned", report.sources_cleaned);
	print_field("Projects archived", report.projects_archived);
	print_field("Files pruned", report.files_pruned);
	print_field("Directories removed", report.directories_removed);
	print_field("Files published", report.files_published);
}

fn print_field(label: &str, value: impl std::fmt::Display) {
	println!("  {label:<24} {value}");
}
