// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The head codec: the initial byte plus variable-width argument shared by
//! every CBOR major type.

use crate::error::DecodeFailure;
use crate::stream::{read_u16, read_u32, read_u64};
use crate::Stream;

/// The top 3 bits of a CBOR initial byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MajorType {
	/// Major type 0: an unsigned integer.
	UnsignedInt,
	/// Major type 1: a negative integer, stored as `-1 - N`.
	NegativeInt,
	/// Major type 2: a byte string.
	ByteString,
	/// Major type 3: a UTF-8 text string (not validated by this codec).
	TextString,
	/// Major type 4: an array.
	Array,
	/// Major type 5: a map.
	Map,
	/// Major type 6: a tag prefixing another item.
	Tag,
	/// Major type 7: simple values, floats, and the break marker.
	Simple,
}

impl MajorType {
	/// Reads the major type out of the top 3 bits of `byte`.
	#[must_use]
	pub fn from_initial_byte(byte: u8) -> Self {
		match byte >> 5 {
			0 => Self::UnsignedInt,
			1 => Self::NegativeInt,
			2 => Self::ByteString,
			3 => Self::TextString,
			4 => Self::Array,
			5 => Self::Map,
			6 => Self::Tag,
			_ => Self::Simple,
		}
	}

	pub(crate) fn shifted(self) -> u8 {
		(match self {
			Self::UnsignedInt => 0,
			Self::NegativeInt => 1,
			Self::ByteString => 2,
			Self::TextString => 3,
			Self::Array => 4,
			Self::Map => 5,
			Self::Tag => 6,
			Self::Simple => 7,
		}) << 5
	}
}

/// Major-7 simple values that aren't a float.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimpleValue {
	/// `0xF4`
	False,
	/// `0xF5`
	True,
	/// `0xF6`
	Null,
	/// `0xF7`
	Undefined,
	/// `0xFF`, the terminator for an indefinite-length container.
	Break,
}

impl SimpleValue {
	/// The encoded byte for this simple value.
	#[must_use]
	pub fn as_byte(self) -> u8 {
		match self {
			Self::False => 0xF4,
			Self::True => 0xF5,
			Self::Null => 0xF6,
			Self::Undefined => 0xF7,
			Self::Break => BREAK,
		}
	}
}

pub(crate) const ADDITIONAL_INFO_MASK: u8 = 0x1F;

pub(crate) const AI_UINT8_FOLLOWS: u8 = 24;
pub(crate) const AI_UINT16_FOLLOWS: u8 = 25;
pub(crate) const AI_UINT32_FOLLOWS: u8 = 26;
pub(crate) const AI_UINT64_FOLLOWS: u8 = 27;
pub(crate) const AI_INDEFINITE: u8 = 31;

/// The single-byte terminator for an indefinite-length container.
pub const BREAK: u8 = 0xFF;

/// The number of bytes [`encode_head`] will write for `argument`, without
/// writing anything. Used by composite operations (byte strings, tagged
/// items) to reserve space for head-plus-payload atomically.
#[must_use]
pub(crate) fn head_len(argument: u64) -> usize {
	match argument {
		0..=23 => 1,
		24..=0xFF => 2,
		0x100..=0xFFFF => 3,
		0x1_0000..=0xFFFF_FFFF => 5,
		_ => 9,
	}
}

/// Encodes `major | ai` followed by the minimum-width big-endian encoding
/// of `argument`, per the normative CBOR rule that the shortest head is
/// always emitted on encode.
///
/// Returns `0`, leaving the stream untouched, if there isn't room for the
/// whole head.
pub fn encode_head(stream: &mut Stream, major: MajorType, argument: u64) -> usize {
	let needed = head_len(argument);
	if stream.remaining() < needed {
		log::debug!(
			"cbor_kit::head: {}",
			DecodeFailure::BufferExhausted { remaining: stream.remaining(), needed }
		);
		return 0;
	}

	match argument {
		0..=23 => stream.put_raw(&[major.shifted() | argument as u8]),
		0x18..=0xFF => stream.put_raw(&[major.shifted() | AI_UINT8_FOLLOWS, argument as u8]),
		0x100..=0xFFFF => {
			let mut bytes = [major.shifted() | AI_UINT16_FOLLOWS, 0, 0];
			bytes[1..].copy_from_slice(&(argument as u16).to_be_bytes());
			stream.put_raw(&bytes);
		}
		0x1_0000..=0xFFFF_FFFF => {
			let mut bytes = [major.shifted() | AI_UINT32_FOLLOWS, 0, 0, 0, 0];
			bytes[1..].copy_from_slice(&(argument as u32).to_be_bytes());
			stream.put_raw(&bytes);
		}
		_ => {
			let mut bytes = [major.shifted() | AI_UINT64_FOLLOWS, 0, 0, 0, 0, 0, 0, 0, 0];
			bytes[1..].copy_from_slice(&argument.to_be_bytes());
			stream.put_raw(&bytes);
		}
	}

	needed
}

/// Reads the additional-information argument of the item whose initial
/// byte is at `offset`, without inspecting (or validating) its major type
/// — that is the caller's responsibility.
///
/// Returns `(argument, bytes_consumed)`. `bytes_consumed` is `0` if
/// `offset` is out of bounds, or if the additional information is one of
/// the reserved values `28..=30`. The indefinite-length marker (`31`) is
/// not an error here: it consumes the one initial byte and yields argument
/// `0`, since it carries no numeric argument of its own.
#[must_use]
pub fn decode_head(stream: &Stream, offset: usize) -> (u64, usize) {
	let data = stream.written();
	let Some(&initial) = data.get(offset) else {
		return (0, 0);
	};

	match initial & ADDITIONAL_INFO_MASK {
		ai @ 0..=23 => (u64::from(ai), 1),
		AI_UINT8_FOLLOWS => match data.get(offset + 1) {
			Some(&byte) => (u64::from(byte), 2),
			None => (0, 0),
		},
		AI_UINT16_FOLLOWS => match read_u16(data, offset + 1) {
			Some(value) => (u64::from(value), 3),
			None => (0, 0),
		},
		AI_UINT32_FOLLOWS => match read_u32(data, offset + 1) {
			Some(value) => (u64::from(value), 5),
			None => (0, 0),
		},
		AI_UINT64_FOLLOWS => match read_u64(data, offset + 1) {
			Some(value) => (value, 9),
			None => (0, 0),
		},
		AI_INDEFINITE => (0, 1),
		ai => {
			log::debug!("cbor_kit::head: {}", DecodeFailure::InvalidAdditionalInfo(ai));
			(0, 0) // 28..=30, reserved
		}
	}
}

/// `true` if the additional-information bits of `byte` are the
/// indefinite-length marker.
#[must_use]
pub(crate) fn is_indefinite(byte: u8) -> bool {
	byte & ADDITIONAL_INFO_MASK == AI_INDEFINITE
}

/// The major type of the item at `offset`, or `None` if `offset` is past
/// the end of the stream's written region.
#[must_use]
pub(crate) fn major_type_at(stream: &Stream, offset: usize) -> Option<MajorType> {
	stream
		.written()
		.get(offset)
		.map(|&byte| MajorType::from_initial_byte(byte))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn minimum_width_boundaries() {
		let cases: &[(u64, usize)] = &[
			(0, 1),
			(23, 1),
			(24, 2),
			(255, 2),
			(256, 3),
			(65535, 3),
			(65536, 5),
			(0xFFFF_FFFF, 5),
			(0x1_0000_0000, 9),
			(u64::MAX, 9),
		];

		for &(argument, expected) in cases {
			assert_eq!(head_len(argument), expected, "argument = {argument}");

			let mut stream = Stream::new(expected);
			let written = encode_head(&mut stream, MajorType::UnsignedInt, argument);
			assert_eq!(written, expected, "argument = {argument}");

			let (decoded, consumed) = decode_head(&stream, 0);
			assert_eq!(decoded, argument);
			assert_eq!(consumed, expected);
		}
	}

	#[test]
	fn literal_bytes() {
		let mut stream = Stream::new(8);
		assert_eq!(encode_head(&mut stream, MajorType::UnsignedInt, 0), 1);
		assert_eq!(stream.written(), &[0x00]);

		let mut stream = Stream::new(8);
		assert_eq!(encode_head(&mut stream, MajorType::UnsignedInt, 23), 1);
		assert_eq!(stream.written(), &[0x17]);

		let mut stream = Stream::new(8);
		assert_eq!(encode_head(&mut stream, MajorType::UnsignedInt, 24), 2);
		assert_eq!(stream.written(), &[0x18, 0x18]);

		let mut stream = Stream::new(8);
		assert_eq!(
			encode_head(&mut stream, MajorType::UnsignedInt, 0x7fff_ffff),
			5
		);
		assert_eq!(stream.written(), &[0x1A, 0x7F, 0xFF, 0xFF, 0xFF]);
	}

	#[test]
	fn buffer_full_returns_zero() {
		let mut stream = Stream::new(0);
		assert_eq!(encode_head(&mut stream, MajorType::UnsignedInt, 0), 0);
		assert_eq!(stream.position(), 0);
	}

	#[test]
	fn reserved_additional_info_fails() {
		let mut buf = [0x1Cu8]; // major 0, ai 28 (reserved)
		let stream = Stream::over(&mut buf);
		assert_eq!(decode_head(&stream, 0), (0, 0));
	}

	#[test]
	fn indefinite_marker_consumes_one_byte() {
		let mut buf = [0x9Fu8]; // array, ai 31
		let stream = Stream::over(&mut buf);
		assert_eq!(decode_head(&stream, 0), (0, 1));
	}
}
