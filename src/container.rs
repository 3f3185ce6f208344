// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arrays (major type 4) and maps (major type 5), both definite- and
//! indefinite-length, plus the shared break marker that terminates an
//! indefinite-length container.

use crate::error::DecodeFailure;
use crate::head::{decode_head, encode_head, is_indefinite, major_type_at, MajorType, AI_INDEFINITE, BREAK};
use crate::Stream;

/// The length of an array or map header, as read back off the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
	/// A definite-length container with exactly this many items (for a
	/// map, this many key/value pairs).
	Definite(u64),
	/// An indefinite-length container, terminated by a [`BREAK`] byte.
	/// Walk its items with [`at_break`] as the stop condition.
	Indefinite,
}

fn serialize_header(stream: &mut Stream, major: MajorType, len: u64) -> usize {
	encode_head(stream, major, len)
}

fn serialize_indefinite_header(stream: &mut Stream, major: MajorType) -> usize {
	if stream.remaining() < 1 {
		return 0;
	}
	stream.put_raw(&[major.shifted() | AI_INDEFINITE]);
	1
}

fn deserialize_header(stream: &Stream, offset: usize, expected: MajorType) -> (Length, usize) {
	match major_type_at(stream, offset) {
		Some(found) if found == expected => {}
		Some(found) => {
			log::debug!(
				"cbor_kit::container: {}",
				DecodeFailure::MajorTypeMismatch { expected, found, offset }
			);
			return (Length::Definite(0), 0);
		}
		None => return (Length::Definite(0), 0),
	}

	match stream.written().get(offset) {
		Some(&byte) if is_indefinite(byte) => (Length::Indefinite, 1),
		Some(_) => {
			let (len, consumed) = decode_head(stream, offset);
			if consumed == 0 {
				(Length::Definite(0), 0)
			} else {
				(Length::Definite(len), consumed)
			}
		}
		None => (Length::Definite(0), 0),
	}
}

/// Serializes a definite-length array header for `len` items.
pub fn serialize_array(stream: &mut Stream, len: u64) -> usize {
	serialize_header(stream, MajorType::Array, len)
}

/// Serializes an indefinite-length array header. The items that follow
/// must be terminated with [`write_break`].
pub fn serialize_array_indefinite(stream: &mut Stream) -> usize {
	serialize_indefinite_header(stream, MajorType::Array)
}

/// Deserializes an array header at `offset`.
#[must_use]
pub fn deserialize_array(stream: &Stream, offset: usize) -> (Length, usize) {
	deserialize_header(stream, offset, MajorType::Array)
}

/// Serializes a definite-length map header for `len` key/value pairs.
pub fn serialize_map(stream: &mut Stream, len: u64) -> usize {
	serialize_header(stream, MajorType::Map, len)
}

/// Serializes an indefinite-length map header. The key/value pairs that
/// follow must be terminated with [`write_break`].
pub fn serialize_map_indefinite(stream: &mut Stream) -> usize {
	serialize_indefinite_header(stream, MajorType::Map)
}

/// Deserializes a map header at `offset`.
#[must_use]
pub fn deserialize_map(stream: &Stream, offset: usize) -> (Length, usize) {
	deserialize_header(stream, offset, MajorType::Map)
}

/// Writes the single-byte terminator for an indefinite-length container.
pub fn write_break(stream: &mut Stream) -> usize {
	if stream.remaining() < 1 {
		return 0;
	}
	stream.put_raw(&[BREAK]);
	1
}

/// `true` if the byte at `offset` is the break marker, or the stream has
/// already run out of bytes there.
///
/// Folding "ran out of bytes" into this check is deliberate: it's meant
/// to be used as a loop predicate for an indefinite-length container, and
/// a truncated stream should stop that loop exactly as a break would,
/// rather than reading past the end.
#[must_use]
pub fn at_break(stream: &Stream, offset: usize) -> bool {
	at_end(stream, offset) || stream.written().get(offset) == Some(&BREAK)
}

/// `true` if `offset` has reached (or passed) the end of the written
/// region, i.e. there is no item left to decode there.
///
/// `offset == position()` is already past the last valid byte — a prior
/// off-by-one here (checking `>` instead of `>=`) would accept one byte of
/// out-of-bounds read as a legitimate offset.
#[must_use]
pub fn at_end(stream: &Stream, offset: usize) -> bool {
	offset >= stream.position()
}

/// `true` if the item at `offset` is a tag (major type 6), or the stream
/// has already run out of bytes there. See [`at_break`] for why the latter
/// is folded in: both are meant as loop/lookahead predicates, not exact
/// positional checks.
#[must_use]
pub fn at_tag(stream: &Stream, offset: usize) -> bool {
	at_end(stream, offset) || major_type_at(stream, offset) == Some(MajorType::Tag)
}
