// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: hashcalc
// Module: weak algorithm warnings helper
// Author: hashcalc maintainers

//! Advisories for registry entries with known practical attacks, and the
//! banner the CLI prints when one of them is requested.

use crate::hcalc::algorithm::Algorithm;
use colored::Colorize;

const NIST_REFERENCE: &str =
	"https://doi.org/10.6028/NIST.SP.800-131Ar2";

/// Metadata describing a weak algorithm entry.
#[derive(Debug, Clone)]
pub struct WeakAlgorithmMetadata {
	pub algorithm: Algorithm,
	/// Replacement suggestion shown to the user.
	pub replacement_hint: &'static str,
}

#[derive(Debug, Clone)]
pub struct WarningMessage {
	pub severity_icon: &'static str,
	pub headline: String,
	pub body: String,
	pub reference: &'static str,
}

impl WarningMessage {
	pub fn banner(&self) -> String {
		format!(
			"{} {} {}",
			self.severity_icon, self.headline, self.body
		)
	}
}

const WEAK_ALGORITHMS: &[WeakAlgorithmMetadata] = &[
	WeakAlgorithmMetadata {
		algorithm: Algorithm::Md2,
		replacement_hint: "Use SHA-256 or SHA-512",
	},
	WeakAlgorithmMetadata {
		algorithm: Algorithm::Md4,
		replacement_hint: "Use SHA-256 or SHA-512",
	},
	WeakAlgorithmMetadata {
		algorithm: Algorithm::Md5,
		replacement_hint: "Use SHA-256 or SHA-512",
	},
	WeakAlgorithmMetadata {
		algorithm: Algorithm::Sha1,
		replacement_hint: "Use SHA-256 or SHA-512",
	},
	WeakAlgorithmMetadata {
		algorithm: Algorithm::Ripemd128,
		replacement_hint: "Use RIPEMD-160 or SHA-256",
	},
];

pub fn metadata_for(
	algorithm: Algorithm,
) -> Option<&'static WeakAlgorithmMetadata> {
	WEAK_ALGORITHMS
		.iter()
		.find(|entry| entry.algorithm == algorithm)
}

pub fn is_weak(algorithm: Algorithm) -> bool {
	metadata_for(algorithm).is_some()
}

pub fn warning_for(algorithm: Algorithm) -> Option<WarningMessage> {
	let metadata = metadata_for(algorithm)?;
	Some(WarningMessage {
		severity_icon: "⚠",
		headline: format!(
			"WARNING: {} is a weak algorithm (collisions known)",
			metadata.algorithm
		),
		body: format!(
			"Do not rely on it for integrity. {}.",
			metadata.replacement_hint
		),
		reference: NIST_REFERENCE,
	})
}

/// Print the banner to stderr; colour follows `NO_COLOR` and the tty.
pub fn emit_warning_banner(message: &WarningMessage) {
	eprintln!("{}", message.banner().yellow().bold());
	eprintln!("{}", format!("Reference: {}", message.reference).yellow());
}
