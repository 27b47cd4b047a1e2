// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: hashcalc
// File: src/hcalc/error.rs
// Author: hashcalc maintainers

use std::io;

/// Failures surfaced by the digest engine and the hex codec.
#[derive(Debug, thiserror::Error)]
pub enum HashCalcError {
	#[error("invalid configuration: {message}")]
	Configuration { message: String },

	#[error("unsupported algorithm `{name}`")]
	UnknownAlgorithm { name: String },

	#[error(transparent)]
	Io(#[from] io::Error),

	#[error("malformed hex input: {message}")]
	Format { message: String },

	#[error("digest computation cancelled")]
	Cancelled,
}

impl HashCalcError {
	pub fn configuration(message: impl Into<String>) -> Self {
		Self::Configuration {
			message: message.into(),
		}
	}

	pub fn format(message: impl Into<String>) -> Self {
		Self::Format {
			message: message.into(),
		}
	}

	/// True for both flavours of configuration failure.
	pub fn is_configuration(&self) -> bool {
		matches!(
			self,
			Self::Configuration { .. } | Self::UnknownAlgorithm { .. }
		)
	}
}

pub type Result<T> = std::result::Result<T, HashCalcError>;
