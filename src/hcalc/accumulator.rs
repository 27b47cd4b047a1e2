// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: hashcalc
// File: src/hcalc/accumulator.rs
// Author: hashcalc maintainers

//! Capability shared by every digest the engine can drive.
//!
//! An accumulator ingests bytes incrementally and yields its digest once.
//! `finalize` takes the boxed accumulator by value, so an accumulator can
//! neither be fed after finalization nor reused for a second computation.

use digest::Digest;

pub trait Accumulator: Send {
	/// Feed the next chunk. Results must not depend on chunk boundaries.
	fn update(&mut self, data: &[u8]);

	fn finalize(self: Box<Self>) -> Vec<u8>;
}

/// Adapter turning any RustCrypto [`Digest`] into an [`Accumulator`].
pub struct HashAccumulator<D> {
	hasher: D,
}

impl<D: Digest> HashAccumulator<D> {
	pub fn new() -> Self {
		Self { hasher: D::new() }
	}
}

impl<D: Digest> Default for HashAccumulator<D> {
	fn default() -> Self {
		Self::new()
	}
}

impl<D> Accumulator for HashAccumulator<D>
where
	D: Digest + Send,
{
	fn update(&mut self, data: &[u8]) {
		Digest::update(&mut self.hasher, data);
	}

	fn finalize(self: Box<Self>) -> Vec<u8> {
		self.hasher.finalize().to_vec()
	}
}
