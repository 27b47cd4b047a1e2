// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: hashcalc
// File: lib.rs
// Author: hashcalc maintainers

pub mod hcalc {
	pub mod accumulator;
	pub mod algorithm;
	pub mod app;
	pub mod base64;
	pub mod codec;
	pub mod engine;
	pub mod error;
	pub mod weak;
}

pub use hcalc::algorithm::Algorithm;
pub use hcalc::engine::{
	get_file_hashes, get_text_hash, hex_to_ascii, DigestEngine,
	DigestResult, EngineConfig,
};
pub use hcalc::error::{HashCalcError, Result};
