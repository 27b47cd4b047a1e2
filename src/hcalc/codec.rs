// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: hashcalc
// File: src/hcalc/codec.rs
// Author: hashcalc maintainers

use crate::hcalc::error::{HashCalcError, Result};

/// Lowercase hex, two characters per byte, no separators.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
	hex::encode(bytes)
}

/// Decode hex and map every byte to the character with the same code
/// point (U+0000..=U+00FF).
pub fn hex_to_text(input: &str) -> Result<String> {
	if let Some((index, c)) = input
		.chars()
		.enumerate()
		.find(|(_, c)| !c.is_ascii_hexdigit())
	{
		return Err(HashCalcError::format(format!(
			"invalid hex character {:?} at position {}",
			c, index
		)));
	}
	// only ASCII digits remain, so bytes and characters agree
	if input.len() % 2 != 0 {
		return Err(HashCalcError::format(format!(
			"odd number of hex digits ({})",
			input.len()
		)));
	}
	let bytes = hex::decode(input)
		.map_err(|err| HashCalcError::format(err.to_string()))?;
	Ok(bytes.into_iter().map(char::from).collect())
}
