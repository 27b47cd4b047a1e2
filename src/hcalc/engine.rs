// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: hashcalc
// File: src/hcalc/engine.rs
// Author: hashcalc maintainers

//! Multiplexed stream digest engine.
//!
//! One forward pass over the source feeds every requested accumulator
//! with the same chunks in the same order. Accumulators are created per
//! call and consumed at the end of it, so nothing leaks between runs.

use crate::hcalc::accumulator::Accumulator;
use crate::hcalc::algorithm::Algorithm;
use crate::hcalc::codec::{bytes_to_hex, hex_to_text};
use crate::hcalc::error::{HashCalcError, Result};
use serde::Serialize;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, trace, warn};

pub const DEFAULT_CHUNK_SIZE: usize = 16 * 1024;

#[derive(Clone, Debug)]
pub struct EngineConfig {
	/// Bytes requested from the source per read.
	pub chunk_size: usize,
}

impl Default for EngineConfig {
	fn default() -> Self {
		EngineConfig {
			chunk_size: DEFAULT_CHUNK_SIZE,
		}
	}
}

impl EngineConfig {
	pub fn validate(&self) -> Result<()> {
		if self.chunk_size == 0 {
			return Err(HashCalcError::configuration(
				"chunk size must be greater than zero",
			));
		}
		Ok(())
	}
}

/// Shared flag checked once per chunk. Cancelling never yields a
/// partial result.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
	cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn cancel(&self) {
		self.cancelled.store(true, Ordering::Relaxed);
	}

	pub fn is_cancelled(&self) -> bool {
		self.cancelled.load(Ordering::Relaxed)
	}
}

/// Hex digests keyed by the algorithm names exactly as they were
/// requested.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DigestResult {
	digests: BTreeMap<String, String>,
}

impl DigestResult {
	pub fn get(&self, name: &str) -> Option<&str> {
		self.digests.get(name).map(String::as_str)
	}

	pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
		self.digests.iter()
	}

	pub fn len(&self) -> usize {
		self.digests.len()
	}

	pub fn is_empty(&self) -> bool {
		self.digests.is_empty()
	}

	pub fn into_inner(self) -> BTreeMap<String, String> {
		self.digests
	}
}

impl<'a> IntoIterator for &'a DigestResult {
	type Item = (&'a String, &'a String);
	type IntoIter = btree_map::Iter<'a, String, String>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl FromIterator<(String, String)> for DigestResult {
	fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
		Self {
			digests: iter.into_iter().collect(),
		}
	}
}

/// Requested names resolved against the registry.
struct DigestPlan {
	keys: Vec<(String, Algorithm)>,
	algorithms: Vec<Algorithm>,
}

impl DigestPlan {
	fn resolve<I, S>(names: I) -> Result<Self>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut keys = Vec::new();
		let mut algorithms = Vec::new();
		for name in names {
			let name = name.as_ref();
			let algorithm =
				Algorithm::from_name(name).ok_or_else(|| {
					HashCalcError::UnknownAlgorithm {
						name: name.to_string(),
					}
				})?;
			if !algorithms.contains(&algorithm) {
				algorithms.push(algorithm);
			}
			keys.push((name.to_string(), algorithm));
		}
		if keys.is_empty() {
			return Err(HashCalcError::configuration(
				"no algorithms requested",
			));
		}
		Ok(Self { keys, algorithms })
	}

	fn accumulators(&self) -> Vec<(Algorithm, Box<dyn Accumulator>)> {
		self.algorithms
			.iter()
			.map(|&algorithm| {
				debug!(%algorithm, "created accumulator");
				(algorithm, algorithm.accumulator())
			})
			.collect()
	}
}

#[derive(Clone, Debug, Default)]
pub struct DigestEngine {
	config: EngineConfig,
	cancel: Option<CancellationToken>,
}

impl DigestEngine {
	pub fn new(config: EngineConfig) -> Self {
		Self {
			config,
			cancel: None,
		}
	}

	pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
		self.cancel = Some(token);
		self
	}

	/// Digest everything `reader` yields with every requested algorithm.
	pub fn compute_reader<R, I, S>(
		&self,
		reader: R,
		names: I,
	) -> Result<DigestResult>
	where
		R: Read,
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		self.config.validate()?;
		let plan = DigestPlan::resolve(names)?;
		self.run(reader, &plan)
	}

	pub fn compute_bytes<I, S>(
		&self,
		data: &[u8],
		names: I,
	) -> Result<DigestResult>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		self.compute_reader(data, names)
	}

	/// Digest a file. Names are checked before the file is opened, and
	/// the handle is closed on every exit path.
	pub fn compute_file<P, I, S>(
		&self,
		path: P,
		names: I,
	) -> Result<DigestResult>
	where
		P: AsRef<Path>,
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		self.config.validate()?;
		let plan = DigestPlan::resolve(names)?;
		let path = path.as_ref();
		let file = File::open(path).map_err(|err| {
			warn!(path = %path.display(), error = %err, "cannot open source");
			err
		})?;
		let reader = BufReader::with_capacity(self.config.chunk_size, file);
		self.run(reader, &plan)
	}

	/// Single-algorithm digest of the UTF-8 bytes of `text`.
	pub fn compute_text(&self, text: &str, name: &str) -> Result<String> {
		let algorithm = Algorithm::from_name(name).ok_or_else(|| {
			HashCalcError::UnknownAlgorithm {
				name: name.to_string(),
			}
		})?;
		let mut accumulator = algorithm.accumulator();
		accumulator.update(text.as_bytes());
		Ok(bytes_to_hex(&accumulator.finalize()))
	}

	fn is_cancelled(&self) -> bool {
		self.cancel
			.as_ref()
			.map_or(false, CancellationToken::is_cancelled)
	}

	fn run<R: Read>(
		&self,
		mut reader: R,
		plan: &DigestPlan,
	) -> Result<DigestResult> {
		let mut accumulators = plan.accumulators();
		let mut buffer = vec![0u8; self.config.chunk_size];
		let mut total: u64 = 0;
		let mut chunks: u64 = 0;
		loop {
			if self.is_cancelled() {
				warn!(bytes = total, "digest cancelled");
				return Err(HashCalcError::Cancelled);
			}
			let count = match reader.read(&mut buffer) {
				Ok(0) => break,
				Ok(count) => count,
				Err(err) if err.kind() == io::ErrorKind::Interrupted => {
					continue
				}
				Err(err) => {
					warn!(bytes = total, error = %err, "read failed");
					return Err(err.into());
				}
			};
			let chunk = &buffer[..count];
			for (_, accumulator) in accumulators.iter_mut() {
				accumulator.update(chunk);
			}
			total += count as u64;
			chunks += 1;
			trace!(chunk = chunks, bytes = count, "fed chunk");
		}
		debug!(
			bytes = total,
			chunks,
			algorithms = accumulators.len(),
			"read pass complete"
		);

		let finished: BTreeMap<Algorithm, String> = accumulators
			.into_iter()
			.map(|(algorithm, accumulator)| {
				(algorithm, bytes_to_hex(&accumulator.finalize()))
			})
			.collect();

		let mut digests = BTreeMap::new();
		for (name, algorithm) in &plan.keys {
			let hex = finished.get(algorithm).ok_or_else(|| {
				HashCalcError::configuration(format!(
					"no accumulator for `{}`",
					name
				))
			})?;
			digests.insert(name.clone(), hex.clone());
		}
		Ok(DigestResult { digests })
	}
}

/// Digest a file with the default configuration.
pub fn get_file_hashes<P, I, S>(path: P, names: I) -> Result<DigestResult>
where
	P: AsRef<Path>,
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	DigestEngine::default().compute_file(path, names)
}

/// Digest a string with a single algorithm.
pub fn get_text_hash(text: &str, name: &str) -> Result<String> {
	DigestEngine::default().compute_text(text, name)
}

pub fn hex_to_ascii(hex: &str) -> Result<String> {
	hex_to_text(hex)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Cursor;

	/// Reader that hands out at most `step` bytes per call and counts
	/// how often it was asked.
	struct Trickle<'a> {
		data: &'a [u8],
		step: usize,
		reads: usize,
	}

	impl Read for Trickle<'_> {
		fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
			self.reads += 1;
			let n = self.step.min(buf.len()).min(self.data.len());
			buf[..n].copy_from_slice(&self.data[..n]);
			self.data = &self.data[n..];
			Ok(n)
		}
	}

	struct FailAfter {
		remaining: usize,
	}

	impl Read for FailAfter {
		fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
			if self.remaining == 0 {
				return Err(io::Error::new(
					io::ErrorKind::Other,
					"device gone",
				));
			}
			let n = self.remaining.min(buf.len());
			buf[..n].fill(b'x');
			self.remaining -= n;
			Ok(n)
		}
	}

	struct InterruptOnce {
		inner: Cursor<&'static [u8]>,
		interrupted: bool,
	}

	impl Read for InterruptOnce {
		fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
			if !self.interrupted {
				self.interrupted = true;
				return Err(io::ErrorKind::Interrupted.into());
			}
			self.inner.read(buf)
		}
	}

	#[test]
	fn single_pass_feeds_every_algorithm() {
		let mut source = Trickle {
			data: b"abc",
			step: 1,
			reads: 0,
		};
		let result = DigestEngine::default()
			.compute_reader(&mut source, ["MD5", "SHA-256", "Base64"])
			.unwrap();
		// three one-byte reads plus the end-of-stream read
		assert_eq!(source.reads, 4);
		assert_eq!(
			result.get("MD5"),
			Some("900150983cd24fb0d6963f7d28e17f72")
		);
		assert_eq!(
			result.get("SHA-256"),
			Some("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
		);
		assert_eq!(result.get("Base64"), Some("59574a6a"));
	}

	#[test]
	fn duplicates_collapse_and_keys_follow_request() {
		let result = DigestEngine::default()
			.compute_bytes(b"abc", ["MD5", "MD5", "base64", "Base64"])
			.unwrap();
		assert_eq!(result.len(), 3);
		assert_eq!(result.get("base64"), result.get("Base64"));
		assert!(result.get("BASE64").is_none());
	}

	#[test]
	fn unknown_algorithm_fails_before_reading() {
		let mut source = Trickle {
			data: b"abc",
			step: 3,
			reads: 0,
		};
		let err = DigestEngine::default()
			.compute_reader(&mut source, ["MD5", "CRC32"])
			.unwrap_err();
		assert!(err.is_configuration());
		assert_eq!(source.reads, 0);
	}

	#[test]
	fn empty_request_is_a_configuration_error() {
		let names: [&str; 0] = [];
		let err = DigestEngine::default()
			.compute_bytes(b"abc", names)
			.unwrap_err();
		assert!(matches!(err, HashCalcError::Configuration { .. }));
	}

	#[test]
	fn zero_chunk_size_is_rejected() {
		let engine = DigestEngine::new(EngineConfig { chunk_size: 0 });
		let err = engine.compute_bytes(b"abc", ["MD5"]).unwrap_err();
		assert!(err.is_configuration());
	}

	#[test]
	fn chunk_size_does_not_change_results() {
		let data: Vec<u8> = (0..50_000u32).map(|i| (i % 251) as u8).collect();
		let names = ["SHA1", "Tiger", "Base64"];
		let reference = DigestEngine::default()
			.compute_bytes(&data, names)
			.unwrap();
		for chunk_size in [1, 7, 64, 4096, 100_000] {
			let engine = DigestEngine::new(EngineConfig { chunk_size });
			assert_eq!(
				engine.compute_bytes(&data, names).unwrap(),
				reference,
				"chunk size {}",
				chunk_size
			);
		}
	}

	#[test]
	fn read_error_returns_no_partial_result() {
		let err = DigestEngine::default()
			.compute_reader(FailAfter { remaining: 40_000 }, ["MD5"])
			.unwrap_err();
		assert!(matches!(err, HashCalcError::Io(_)));
	}

	#[test]
	fn interrupted_reads_are_retried() {
		let source = InterruptOnce {
			inner: Cursor::new(&b"abc"[..]),
			interrupted: false,
		};
		let result = DigestEngine::default()
			.compute_reader(source, ["MD5"])
			.unwrap();
		assert_eq!(
			result.get("MD5"),
			Some("900150983cd24fb0d6963f7d28e17f72")
		);
	}

	/// Cancels the shared token after handing out its first chunk.
	struct CancelAfterFirst {
		token: CancellationToken,
		data: &'static [u8],
	}

	impl Read for CancelAfterFirst {
		fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
			let n = buf.len().min(self.data.len());
			buf[..n].copy_from_slice(&self.data[..n]);
			self.data = &self.data[n..];
			self.token.cancel();
			Ok(n)
		}
	}

	#[test]
	fn cancelling_mid_stream_discards_fed_chunks() {
		let token = CancellationToken::new();
		let source = CancelAfterFirst {
			token: token.clone(),
			data: b"abcdefghijkl",
		};
		let engine = DigestEngine::new(EngineConfig { chunk_size: 4 })
			.with_cancellation(token.clone());
		let err = engine
			.compute_reader(source, ["MD5", "Base64"])
			.unwrap_err();
		assert!(matches!(err, HashCalcError::Cancelled));
		assert!(token.is_cancelled());
	}

	#[test]
	fn result_collects_from_pairs() {
		let empty: DigestResult = std::iter::empty().collect();
		assert!(empty.is_empty());
		let result: DigestResult =
			[("MD5".to_string(), "00".to_string())].into_iter().collect();
		assert!(!result.is_empty());
		assert_eq!(result.get("MD5"), Some("00"));
	}

	#[test]
	fn cancelled_run_fails() {
		let token = CancellationToken::new();
		token.cancel();
		let engine = DigestEngine::default().with_cancellation(token);
		let err = engine.compute_bytes(b"abc", ["MD5"]).unwrap_err();
		assert!(matches!(err, HashCalcError::Cancelled));
	}

	#[test]
	fn text_digest_of_empty_string() {
		assert_eq!(
			get_text_hash("", "MD5").unwrap(),
			"d41d8cd98f00b204e9800998ecf8427e"
		);
	}

	#[test]
	fn text_digest_rejects_unknown_algorithm() {
		let err = get_text_hash("abc", "SHA-3").unwrap_err();
		match err {
			HashCalcError::UnknownAlgorithm { name } => {
				assert_eq!(name, "SHA-3")
			}
			other => panic!("unexpected error: {other:?}"),
		}
	}

	#[test]
	fn hex_to_ascii_recovers_base64_text() {
		let hex = get_text_hash("abc", "Base64").unwrap();
		assert_eq!(hex_to_ascii(&hex).unwrap(), "YWJj");
	}
}
