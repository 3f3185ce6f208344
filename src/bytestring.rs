// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Byte strings (major type 2) and text strings (major type 3).
//!
//! Chunked (indefinite-length) strings are not produced or accepted here;
//! [`crate::walker`] skips over them as opaque byte ranges but this module
//! only ever deals in the definite-length form.

use crate::error::DecodeFailure;
use crate::head::{decode_head, encode_head, head_len, major_type_at, is_indefinite, MajorType};
use crate::Stream;

/// Serializes `value` as a definite-length CBOR byte string.
///
/// The head and payload are reserved as a single atomic unit: if there
/// isn't room for both, nothing is written and this returns `0`.
pub fn serialize_byte_string(stream: &mut Stream, value: &[u8]) -> usize {
	serialize_string(stream, MajorType::ByteString, value)
}

/// Serializes `value` as a definite-length CBOR text string.
///
/// `cbor-kit` never validates UTF-8 on decode; this only requires a
/// well-formed `&str` to avoid generating invalid output on encode.
pub fn serialize_text_string(stream: &mut Stream, value: &str) -> usize {
	serialize_string(stream, MajorType::TextString, value.as_bytes())
}

fn serialize_string(stream: &mut Stream, major: MajorType, value: &[u8]) -> usize {
	let needed = head_len(value.len() as u64) + value.len();
	if stream.remaining() < needed {
		return 0;
	}

	encode_head(stream, major, value.len() as u64);
	stream.put_raw(value);
	needed
}

/// Deserializes a byte string at `offset` into `dst`.
///
/// `dst` must have room for the payload plus one trailing byte, which this
/// always sets to `0` after the copied payload — a C-string-style
/// terminator callers can rely on without separately tracking the decoded
/// length. Returns the number of CBOR-encoded bytes consumed (head plus
/// payload), or `0` on any failure: wrong major type, a malformed or
/// indefinite-length head, a truncated payload, or a `dst` too small.
#[must_use]
pub fn deserialize_byte_string(stream: &Stream, offset: usize, dst: &mut [u8]) -> usize {
	deserialize_string(stream, offset, MajorType::ByteString, dst)
}

/// Deserializes a text string at `offset` into `dst`, under the same
/// conventions as [`deserialize_byte_string`]. The bytes copied into `dst`
/// are not validated as UTF-8.
#[must_use]
pub fn deserialize_text_string(stream: &Stream, offset: usize, dst: &mut [u8]) -> usize {
	deserialize_string(stream, offset, MajorType::TextString, dst)
}

fn deserialize_string(stream: &Stream, offset: usize, expected: MajorType, dst: &mut [u8]) -> usize {
	match major_type_at(stream, offset) {
		Some(found) if found == expected => {}
		Some(found) => {
			log::debug!(
				"cbor_kit::bytestring: {}",
				DecodeFailure::MajorTypeMismatch { expected, found, offset }
			);
			return 0;
		}
		None => return 0,
	}

	let data = stream.written();
	match data.get(offset) {
		Some(&byte) if is_indefinite(byte) => return 0,
		Some(_) => {}
		None => return 0,
	}

	let (len, consumed_head) = decode_head(stream, offset);
	if consumed_head == 0 {
		return 0;
	}
	let len = len as usize;

	if dst.len() < len + 1 {
		log::debug!(
			"cbor_kit::bytestring: {}",
			DecodeFailure::DestinationTooSmall { available: dst.len(), required: len + 1 }
		);
		return 0;
	}

	let payload_start = offset + consumed_head;
	let Some(payload) = data.get(payload_start..payload_start + len) else {
		return 0;
	};

	dst[..len].copy_from_slice(payload);
	dst[len] = 0;
	consumed_head + len
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn byte_string_round_trip() {
		let mut stream = Stream::new(32);
		let written = serialize_byte_string(&mut stream, b"hello");
		assert_eq!(written, 6); // 1 head byte + 5 payload

		let mut dst = [0xAAu8; 6];
		let read = deserialize_byte_string(&stream, 0, &mut dst);
		assert_eq!(read, written);
		assert_eq!(&dst, b"hello\0");
	}

	#[test]
	fn text_string_round_trip() {
		let mut stream = Stream::new(32);
		serialize_text_string(&mut stream, "IETF");

		let mut dst = [0u8; 5];
		let read = deserialize_text_string(&stream, 0, &mut dst);
		assert_eq!(read, 5);
		assert_eq!(&dst, b"IETF\0");
	}

	#[test]
	fn empty_string_round_trip() {
		let mut stream = Stream::new(8);
		let written = serialize_byte_string(&mut stream, b"");
		assert_eq!(written, 1);

		let mut dst = [0xFFu8; 1];
		assert_eq!(deserialize_byte_string(&stream, 0, &mut dst), 1);
		assert_eq!(dst, [0]);
	}

	#[test]
	fn destination_too_small_fails() {
		let mut stream = Stream::new(32);
		serialize_byte_string(&mut stream, b"hello");

		let mut dst = [0u8; 5]; // needs 6 (5 payload + terminator)
		assert_eq!(deserialize_byte_string(&stream, 0, &mut dst), 0);
	}

	#[test]
	fn buffer_full_writes_nothing() {
		let mut stream = Stream::new(3);
		assert_eq!(serialize_byte_string(&mut stream, b"hello"), 0);
		assert_eq!(stream.position(), 0);
	}

	#[test]
	fn major_type_mismatch_fails() {
		let mut stream = Stream::new(32);
		serialize_text_string(&mut stream, "hi");

		let mut dst = [0u8; 4];
		assert_eq!(deserialize_byte_string(&stream, 0, &mut dst), 0);
	}
}

#[cfg(test)]
mod quickcheck_tests {
	use quickcheck_macros::quickcheck;

	use super::*;

	#[quickcheck]
	fn byte_string_round_trip(value: Vec<u8>) -> bool {
		let mut stream = Stream::new(value.len() + 16);
		let written = serialize_byte_string(&mut stream, &value);
		if written == 0 {
			return false;
		}

		let mut dst = vec![0u8; value.len() + 1];
		let read = deserialize_byte_string(&stream, 0, &mut dst);
		read == written && dst[..value.len()] == value[..] && dst[value.len()] == 0
	}

	#[quickcheck]
	fn text_string_round_trip(value: String) -> bool {
		let mut stream = Stream::new(value.len() + 16);
		let written = serialize_text_string(&mut stream, &value);
		if written == 0 {
			return false;
		}

		let mut dst = vec![0u8; value.len() + 1];
		let read = deserialize_text_string(&stream, 0, &mut dst);
		read == written && dst[..value.len()] == *value.as_bytes()
	}
}
