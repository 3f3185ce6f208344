// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Internal diagnostics for decode failures.
//!
//! None of the public serialize/deserialize operations *return* a
//! [`DecodeFailure`] — per the byte-count convention documented on
//! [`crate`], they return `0`. This type exists so that [`crate::walker`]
//! can log a specific, structured reason before collapsing a failed step to
//! that `0`, rather than discarding the reason entirely.

use crate::head::MajorType;

/// Why a decode step failed.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum DecodeFailure {
	/// The additional-information bits (28..=30) don't encode a valid
	/// argument width.
	#[error("additional information {0} is reserved and does not encode a valid argument")]
	InvalidAdditionalInfo(u8),

	/// The major type at `offset` doesn't match what the caller expected.
	#[error("expected major type {expected:?}, found {found:?} at offset {offset}")]
	MajorTypeMismatch {
		/// The major type the caller required.
		expected: MajorType,
		/// The major type actually present.
		found: MajorType,
		/// Byte offset of the mismatched item.
		offset: usize,
	},

	/// There weren't enough bytes left in the stream to read or write.
	#[error("buffer has {remaining} byte(s) remaining, {needed} required")]
	BufferExhausted {
		/// Bytes actually remaining.
		remaining: usize,
		/// Bytes the operation needed.
		needed: usize,
	},

	/// A caller-supplied destination buffer was too small for the payload
	/// plus its trailing zero byte.
	#[error("destination buffer has {available} byte(s), {required} required (payload + terminator)")]
	DestinationTooSmall {
		/// Bytes available in the destination.
		available: usize,
		/// Bytes required, i.e. `len + 1`.
		required: usize,
	},

	/// Tag-1 (epoch datetime) rejects negative values on serialize.
	#[error("epoch datetime tag rejects negative value {0}")]
	NegativeEpoch(i64),

	/// The walker's recursion depth gauge tripped.
	#[error("recursion depth limit ({0}) exceeded while walking a container")]
	RecursionLimitExceeded(usize),

	/// Tag 0/1 datetime parsing failed.
	#[cfg(feature = "datetime")]
	#[error("failed to parse RFC 3339 datetime: {0}")]
	Datetime(#[from] chrono::ParseError),
}
