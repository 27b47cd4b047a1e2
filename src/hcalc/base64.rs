// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: hashcalc
// File: src/hcalc/base64.rs
// Author: hashcalc maintainers

//! Base64 presented through the accumulator interface.
//!
//! The adapter lets "encode as Base64" ride along in the same read pass as
//! the real hashes. It buffers everything it is fed and encodes the whole
//! buffer at finalization, so its "digest" grows with the input.

use crate::hcalc::accumulator::Accumulator;
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Nominal block size; the encoder works on the whole buffer instead.
pub const BLOCK_SIZE: usize = 1;

#[derive(Debug, Default)]
pub struct Base64Accumulator {
	buffer: Vec<u8>,
}

impl Base64Accumulator {
	pub fn new() -> Self {
		Self::default()
	}

	/// Bytes buffered so far.
	pub fn len(&self) -> usize {
		self.buffer.len()
	}

	pub fn is_empty(&self) -> bool {
		self.buffer.is_empty()
	}

	/// Padding needed to reach the next block boundary. Always zero.
	pub fn pad_len(&self) -> usize {
		let n = self.buffer.len() % BLOCK_SIZE;
		if n > 0 {
			BLOCK_SIZE - n
		} else {
			0
		}
	}

	pub fn reset(&mut self) {
		self.buffer.clear();
	}

	/// Standard, `=`-padded Base64 text of the buffered bytes.
	pub fn encoded(&self) -> String {
		STANDARD.encode(&self.buffer)
	}
}

impl Accumulator for Base64Accumulator {
	fn update(&mut self, data: &[u8]) {
		self.buffer.extend_from_slice(data);
	}

	fn finalize(self: Box<Self>) -> Vec<u8> {
		debug_assert_eq!(self.pad_len(), 0);
		self.encoded().into_bytes()
	}
}
