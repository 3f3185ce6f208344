// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Booleans: the major-7 simple values `false` (`0xF4`) and `true`
//! (`0xF5`).

use crate::head::SimpleValue;
use crate::Stream;

/// Serializes `value` as a single-byte CBOR simple value.
pub fn serialize_bool(stream: &mut Stream, value: bool) -> usize {
	if stream.remaining() < 1 {
		return 0;
	}

	let byte = if value {
		SimpleValue::True
	} else {
		SimpleValue::False
	};
	stream.put_raw(&[byte.as_byte()]);
	1
}

/// Deserializes a boolean at `offset`.
///
/// This does not check that the byte at `offset` is actually major type 7,
/// nor that it's one of the two boolean simple values: only the exact byte
/// `0xF5` decodes to `true`, and every other byte — including a malformed
/// or unrelated item — decodes to `false` while still reporting 1 byte
/// consumed. This is a preserved quirk, not a bug: callers that need to
/// reject non-boolean input check the major type themselves first (the
/// walker does this).
#[must_use]
pub fn deserialize_bool(stream: &Stream, offset: usize) -> (bool, usize) {
	match stream.written().get(offset) {
		Some(&byte) => (byte == SimpleValue::True.as_byte(), 1),
		None => (false, 0),
	}
}
