// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integer serialization: major type 0 (unsigned) and major type 1
//! (negative, stored as `-1 - N`).

use crate::error::DecodeFailure;
use crate::head::{decode_head, encode_head, major_type_at, MajorType};
use crate::Stream;

/// Serializes `value` as a 32-bit CBOR integer.
pub fn serialize_int(stream: &mut Stream, value: i32) -> usize {
	serialize_int64(stream, i64::from(value))
}

/// Deserializes a CBOR integer at `offset`, failing if it doesn't fit in
/// an `i32`.
#[must_use]
pub fn deserialize_int(stream: &Stream, offset: usize) -> (i32, usize) {
	let (value, len) = deserialize_int64(stream, offset);
	if len == 0 || value < i64::from(i32::MIN) || value > i64::from(i32::MAX) {
		return (0, 0);
	}
	(value as i32, len)
}

/// Serializes `value` as an unsigned CBOR integer (major type 0).
pub fn serialize_uint64(stream: &mut Stream, value: u64) -> usize {
	encode_head(stream, MajorType::UnsignedInt, value)
}

/// Deserializes an unsigned CBOR integer at `offset`. Fails if the item
/// there isn't major type 0.
#[must_use]
pub fn deserialize_uint64(stream: &Stream, offset: usize) -> (u64, usize) {
	match major_type_at(stream, offset) {
		Some(MajorType::UnsignedInt) => decode_head(stream, offset),
		Some(found) => {
			log::debug!(
				"cbor_kit::int: {}",
				DecodeFailure::MajorTypeMismatch { expected: MajorType::UnsignedInt, found, offset }
			);
			(0, 0)
		}
		None => (0, 0),
	}
}

/// Serializes `value` as a signed CBOR integer: major type 0 for
/// non-negative values, major type 1 (`-1 - value`) otherwise.
///
/// The `-1 - value` subtraction is done in `i128` so that `i64::MIN`,
/// whose negation overflows `i64`, still serializes correctly.
pub fn serialize_int64(stream: &mut Stream, value: i64) -> usize {
	if value >= 0 {
		encode_head(stream, MajorType::UnsignedInt, value as u64)
	} else {
		let argument = (-1i128 - i128::from(value)) as u64;
		encode_head(stream, MajorType::NegativeInt, argument)
	}
}

/// Deserializes a signed CBOR integer at `offset`. Fails if the argument
/// doesn't fit in an `i64` once the major-type-1 `-1 - N` transform (or
/// the major-type-0 direct mapping) is applied.
#[must_use]
pub fn deserialize_int64(stream: &Stream, offset: usize) -> (i64, usize) {
	match major_type_at(stream, offset) {
		Some(MajorType::UnsignedInt) => {
			let (argument, len) = decode_head(stream, offset);
			if len == 0 || argument > i64::MAX as u64 {
				return (0, 0);
			}
			(argument as i64, len)
		}
		Some(MajorType::NegativeInt) => {
			let (argument, len) = decode_head(stream, offset);
			if len == 0 {
				return (0, 0);
			}
			let value = -1i128 - i128::from(argument);
			if value < i128::from(i64::MIN) {
				return (0, 0);
			}
			(value as i64, len)
		}
		_ => (0, 0),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn round_trip_boundaries() {
		for &value in &[0i64, 1, -1, 23, 24, -24, -25, i32::MAX as i64, i32::MIN as i64] {
			let mut stream = Stream::new(16);
			let written = serialize_int64(&mut stream, value);
			assert!(written > 0, "value = {value}");
			let (decoded, read) = deserialize_int64(&stream, 0);
			assert_eq!(decoded, value);
			assert_eq!(read, written);
		}
	}

	#[test]
	fn i64_min_round_trips() {
		let mut stream = Stream::new(16);
		let written = serialize_int64(&mut stream, i64::MIN);
		assert!(written > 0);
		let (decoded, _) = deserialize_int64(&stream, 0);
		assert_eq!(decoded, i64::MIN);
	}

	#[test]
	fn negative_one_is_argument_zero() {
		let mut stream = Stream::new(16);
		serialize_int64(&mut stream, -1);
		assert_eq!(stream.written(), &[0x20]); // major 1, ai 0
	}

	#[test]
	fn out_of_i32_range_fails() {
		let mut stream = Stream::new(16);
		serialize_int64(&mut stream, i64::from(i32::MAX) + 1);
		let (value, len) = deserialize_int(&stream, 0);
		assert_eq!((value, len), (0, 0));
	}

	#[test]
	fn type_mismatch_fails() {
		let mut stream = Stream::new(16);
		crate::head::encode_head(&mut stream, MajorType::ByteString, 1);
		assert_eq!(deserialize_uint64(&stream, 0), (0, 0));
	}
}

#[cfg(test)]
mod quickcheck_tests {
	use quickcheck_macros::quickcheck;

	use super::*;

	#[quickcheck]
	fn round_trip_i64(value: i64) -> bool {
		let mut stream = Stream::new(16);
		let written = serialize_int64(&mut stream, value);
		let (decoded, read) = deserialize_int64(&stream, 0);
		written > 0 && decoded == value && read == written
	}

	#[quickcheck]
	fn round_trip_u64(value: u64) -> bool {
		let mut stream = Stream::new(16);
		let written = serialize_uint64(&mut stream, value);
		let (decoded, read) = deserialize_uint64(&stream, 0);
		written > 0 && decoded == value && read == written
	}

	#[quickcheck]
	fn minimum_width(value: u64) -> bool {
		let mut stream = Stream::new(16);
		let written = serialize_uint64(&mut stream, value);
		written == crate::head::head_len(value)
	}
}
