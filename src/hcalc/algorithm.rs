// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: hashcalc
// File: src/hcalc/algorithm.rs
// Author: hashcalc maintainers

//! Registry of the algorithms the engine knows how to drive.
//!
//! Selection is a closed enum rather than free-form strings: every
//! variant maps to its constructor through an exhaustive `match`, and the
//! registry order is the iteration order of [`Algorithm`].

use crate::hcalc::accumulator::{Accumulator, HashAccumulator};
use crate::hcalc::base64::Base64Accumulator;
use serde::Serialize;
use std::fmt;
use strum::{EnumIter, IntoEnumIterator};

#[derive(
	Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, EnumIter,
)]
pub enum Algorithm {
	Base64,
	Md2,
	Md4,
	Md5,
	Sha1,
	Sha256,
	Sha384,
	Sha512,
	Ripemd128,
	Ripemd160,
	Tiger,
	Whirlpool,
}

/// Whether the output can be turned back into the input.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlgorithmKind {
	OneWay,
	Reversible,
}

impl fmt::Display for AlgorithmKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::OneWay => write!(f, "one-way"),
			Self::Reversible => write!(f, "reversible"),
		}
	}
}

impl Algorithm {
	/// Canonical registry name.
	pub const fn name(self) -> &'static str {
		match self {
			Self::Base64 => "Base64",
			Self::Md2 => "MD2",
			Self::Md4 => "MD4",
			Self::Md5 => "MD5",
			Self::Sha1 => "SHA1",
			Self::Sha256 => "SHA-256",
			Self::Sha384 => "SHA-384",
			Self::Sha512 => "SHA-512",
			Self::Ripemd128 => "RIPEMD-128",
			Self::Ripemd160 => "RIPEMD-160",
			Self::Tiger => "Tiger",
			Self::Whirlpool => "Whirlpool",
		}
	}

	pub const fn kind(self) -> AlgorithmKind {
		match self {
			Self::Base64 => AlgorithmKind::Reversible,
			_ => AlgorithmKind::OneWay,
		}
	}

	/// Digest size in bytes; `None` when the output tracks the input size.
	pub const fn digest_len(self) -> Option<usize> {
		match self {
			Self::Base64 => None,
			Self::Md2 | Self::Md4 | Self::Md5 | Self::Ripemd128 => {
				Some(16)
			}
			Self::Sha1 | Self::Ripemd160 => Some(20),
			Self::Tiger => Some(24),
			Self::Sha256 => Some(32),
			Self::Sha384 => Some(48),
			Self::Sha512 | Self::Whirlpool => Some(64),
		}
	}

	/// Resolve a registry name. Names are case-sensitive, except
	/// `Base64`, which matches in any case.
	pub fn from_name(name: &str) -> Option<Self> {
		Self::iter().find(|alg| match alg {
			Self::Base64 => alg.name().eq_ignore_ascii_case(name),
			_ => alg.name() == name,
		})
	}

	/// A fresh, empty accumulator for this algorithm.
	pub fn accumulator(self) -> Box<dyn Accumulator> {
		match self {
			Self::Base64 => Box::new(Base64Accumulator::new()),
			Self::Md2 => Box::new(HashAccumulator::<md2::Md2>::new()),
			Self::Md4 => Box::new(HashAccumulator::<md4::Md4>::new()),
			Self::Md5 => Box::new(HashAccumulator::<md5::Md5>::new()),
			Self::Sha1 => Box::new(HashAccumulator::<sha1::Sha1>::new()),
			Self::Sha256 => {
				Box::new(HashAccumulator::<sha2::Sha256>::new())
			}
			Self::Sha384 => {
				Box::new(HashAccumulator::<sha2::Sha384>::new())
			}
			Self::Sha512 => {
				Box::new(HashAccumulator::<sha2::Sha512>::new())
			}
			Self::Ripemd128 => {
				Box::new(HashAccumulator::<ripemd::Ripemd128>::new())
			}
			Self::Ripemd160 => {
				Box::new(HashAccumulator::<ripemd::Ripemd160>::new())
			}
			Self::Tiger => {
				Box::new(HashAccumulator::<tiger::Tiger>::new())
			}
			Self::Whirlpool => {
				Box::new(HashAccumulator::<whirlpool::Whirlpool>::new())
			}
		}
	}
}

impl fmt::Display for Algorithm {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl Serialize for Algorithm {
	fn serialize<S: serde::Serializer>(
		&self,
		serializer: S,
	) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(self.name())
	}
}

/// Every supported algorithm, in registry order.
pub fn registry() -> impl Iterator<Item = Algorithm> {
	Algorithm::iter()
}

/// Registry names, in registry order.
pub fn names() -> Vec<&'static str> {
	registry().map(Algorithm::name).collect()
}
