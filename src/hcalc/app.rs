// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: hashcalc
// File: app.rs
// Author: hashcalc maintainers

use crate::hcalc::algorithm::{registry, Algorithm, AlgorithmKind};
use crate::hcalc::codec::hex_to_text;
use crate::hcalc::engine::{
	DigestEngine, DigestResult, EngineConfig, DEFAULT_CHUNK_SIZE,
};
use crate::hcalc::error::HashCalcError;
use crate::hcalc::weak::{emit_warning_banner, is_weak, warning_for};
use clap::{crate_name, Arg, ArgAction};
use serde::Serialize;
use std::error::Error;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "HASHCALC_LOG";

const HELP_TEMPLATE: &str = "{before-help}{name} {version}
Written by {author-with-newline}{about-with-newline}
Commands:
  hashcalc file -a MD5 -a SHA-256 <PATH>...   Digest files in one pass each
  hashcalc text -a SHA-512 <INPUT>            Digest a string
  hashcalc hex-to-text <HEX>                  Decode hex into characters
  hashcalc list                               Show supported algorithms
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(clap::ValueEnum, Debug, Copy, Clone, Eq, PartialEq)]
pub enum OutputFormat {
	Text,
	Json,
}

#[derive(Serialize)]
struct FileRecord<'a> {
	path: &'a str,
	digests: &'a DigestResult,
}

#[derive(Serialize)]
struct TextRecord<'a> {
	input: &'a str,
	digests: &'a DigestResult,
}

#[derive(Serialize)]
struct RegistryRecord {
	algorithm: Algorithm,
	kind: AlgorithmKind,
	digest_len: Option<usize>,
	weak: bool,
}

fn algorithm_arg() -> Arg {
	Arg::new("algorithm")
		.short('a')
		.long("algorithm")
		.help("Algorithm name as listed by `hashcalc list` (repeatable)")
		.action(ArgAction::Append)
		.required_unless_present("all")
}

fn all_arg() -> Arg {
	Arg::new("all")
		.long("all")
		.help("Use every supported algorithm")
		.action(ArgAction::SetTrue)
		.conflicts_with("algorithm")
}

fn format_arg() -> Arg {
	Arg::new("format")
		.short('f')
		.long("format")
		.value_parser(clap::value_parser!(OutputFormat))
		.help("Output format (text, json)")
		.default_value("text")
}

pub fn build_cli() -> clap::Command {
	clap::Command::new(crate_name!())
		.color(clap::ColorChoice::Never)
		.help_template(HELP_TEMPLATE)
		.bin_name(crate_name!())
		.version(clap::crate_version!())
		.author(clap::crate_authors!())
		.about("Compute several digests of the same data in a single pass")
		.subcommand_required(true)
		.arg_required_else_help(true)
		.subcommand(
			clap::Command::new("file")
				.about("Digest one or more files")
				.arg(algorithm_arg())
				.arg(all_arg())
				.arg(format_arg())
				.arg(
					Arg::new("chunk-size")
						.long("chunk-size")
						.value_parser(clap::value_parser!(usize))
						.help("Bytes read from the file per chunk [default: 16384]"),
				)
				.arg(
					Arg::new("path")
						.help("Files to digest")
						.action(ArgAction::Append)
						.required(true),
				),
		)
		.subcommand(
			clap::Command::new("text")
				.about("Digest a string")
				.arg(algorithm_arg())
				.arg(all_arg())
				.arg(format_arg())
				.arg(
					Arg::new("input")
						.help("String to digest")
						.required(true),
				),
		)
		.subcommand(
			clap::Command::new("hex-to-text")
				.about("Decode hex into characters, one per byte")
				.arg(
					Arg::new("hex")
						.help("Even-length hex string")
						.required(true),
				),
		)
		.subcommand(
			clap::Command::new("list")
				.about("List supported algorithms")
				.arg(format_arg()),
		)
}

fn selected_algorithms(args: &clap::ArgMatches) -> Vec<String> {
	if args.get_flag("all") {
		return registry().map(|alg| alg.name().to_string()).collect();
	}
	args.get_many::<String>("algorithm")
		.map(|values| values.cloned().collect())
		.unwrap_or_default()
}

fn warn_weak(names: &[String]) {
	let mut seen = Vec::new();
	for algorithm in names.iter().filter_map(|n| Algorithm::from_name(n)) {
		if seen.contains(&algorithm) {
			continue;
		}
		seen.push(algorithm);
		if let Some(message) = warning_for(algorithm) {
			emit_warning_banner(&message);
		}
	}
}

/// Reversible results are shown as the text they encode.
fn display_value(name: &str, hex: &str) -> Result<String, Box<dyn Error>> {
	match Algorithm::from_name(name).map(Algorithm::kind) {
		Some(AlgorithmKind::Reversible) => Ok(hex_to_text(hex)?),
		_ => Ok(hex.to_string()),
	}
}

fn print_result(
	label: &str,
	result: &DigestResult,
) -> Result<(), Box<dyn Error>> {
	for (name, hex) in result {
		println!("{}  {}  {}", name, display_value(name, hex)?, label);
	}
	Ok(())
}

fn handle_file(args: &clap::ArgMatches) -> Result<(), Box<dyn Error>> {
	let names = selected_algorithms(args);
	let format = args
		.get_one::<OutputFormat>("format")
		.copied()
		.unwrap_or(OutputFormat::Text);
	let chunk_size = args
		.get_one::<usize>("chunk-size")
		.copied()
		.unwrap_or(DEFAULT_CHUNK_SIZE);
	let engine = DigestEngine::new(EngineConfig { chunk_size });
	warn_weak(&names);

	for path in args.get_many::<String>("path").into_iter().flatten() {
		let result = engine.compute_file(path, &names)?;
		match format {
			OutputFormat::Text => print_result(path, &result)?,
			OutputFormat::Json => println!(
				"{}",
				serde_json::to_string(&FileRecord {
					path,
					digests: &result,
				})?
			),
		}
	}
	Ok(())
}

fn handle_text(args: &clap::ArgMatches) -> Result<(), Box<dyn Error>> {
	let names = selected_algorithms(args);
	let format = args
		.get_one::<OutputFormat>("format")
		.copied()
		.unwrap_or(OutputFormat::Text);
	let input = args
		.get_one::<String>("input")
		.ok_or("input must be provided")?;
	let engine = DigestEngine::default();
	warn_weak(&names);

	let result = names
		.iter()
		.map(|name| {
			engine
				.compute_text(input, name)
				.map(|hex| (name.clone(), hex))
		})
		.collect::<Result<DigestResult, HashCalcError>>()?;

	match format {
		OutputFormat::Text => print_result(input, &result)?,
		OutputFormat::Json => println!(
			"{}",
			serde_json::to_string(&TextRecord {
				input,
				digests: &result,
			})?
		),
	}
	Ok(())
}

fn handle_hex_to_text(
	args: &clap::ArgMatches,
) -> Result<(), Box<dyn Error>> {
	let hex = args.get_one::<String>("hex").ok_or("hex must be provided")?;
	println!("{}", hex_to_text(hex)?);
	Ok(())
}

fn handle_list(args: &clap::ArgMatches) -> Result<(), Box<dyn Error>> {
	let format = args
		.get_one::<OutputFormat>("format")
		.copied()
		.unwrap_or(OutputFormat::Text);
	let records: Vec<RegistryRecord> = registry()
		.map(|algorithm| RegistryRecord {
			algorithm,
			kind: algorithm.kind(),
			digest_len: algorithm.digest_len(),
			weak: is_weak(algorithm),
		})
		.collect();
	match format {
		OutputFormat::Text => {
			for record in &records {
				let size = record
					.digest_len
					.map(|len| format!("{} bits", len * 8))
					.unwrap_or_else(|| "variable".to_string());
				let note = match (record.kind, record.weak) {
					(AlgorithmKind::Reversible, _) => "  (not a digest)",
					(_, true) => "  (weak)",
					_ => "",
				};
				println!(
					"{:<12} {:<11} {}{}",
					record.algorithm.name(),
					record.kind.to_string(),
					size,
					note
				);
			}
		}
		OutputFormat::Json => {
			println!("{}", serde_json::to_string(&records)?)
		}
	}
	Ok(())
}

fn init_tracing() {
	let filter = EnvFilter::try_from_env(LOG_ENV)
		.unwrap_or_else(|_| EnvFilter::new("warn"));
	// A subscriber may already be installed when embedded; keep it.
	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.try_init();
}

pub fn run() -> Result<(), Box<dyn Error>> {
	init_tracing();
	let matches = build_cli().get_matches();

	match matches.subcommand() {
		Some(("file", args)) => handle_file(args),
		Some(("text", args)) => handle_text(args),
		Some(("hex-to-text", args)) => handle_hex_to_text(args),
		Some(("list", args)) => handle_list(args),
		_ => Ok(()),
	}
}
