// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A recursive, non-validating diagnostic walker: logs every item in a
//! stream via the [`log`] crate without requiring the caller to know the
//! schema up front. Useful for inspecting an unfamiliar or malformed
//! payload; not a substitute for typed deserialization.

use crate::container::{at_end, deserialize_array, deserialize_map, Length};
use crate::error::DecodeFailure;
use crate::head::{decode_head, major_type_at, MajorType, ADDITIONAL_INFO_MASK, BREAK};
use crate::int::deserialize_int64;
use crate::{float, tag, Stream};

/// Containers nested this deep abort the walk rather than recurse
/// further, guarding against a pathological or adversarial indefinite
/// chain of nested containers.
pub const MAX_DEPTH: usize = 32;

/// Walks and logs every top-level item in `stream`, in order.
pub fn decode_all(stream: &Stream) {
	let mut offset = 0;
	while !at_end(stream, offset) {
		let next = decode_at(stream, offset);
		if next <= offset {
			log::warn!("cbor_kit::walker: stuck at offset {offset}, aborting");
			break;
		}
		offset = next;
	}
}

/// Walks and logs a single item at `offset`, recursing into containers.
/// Returns the offset immediately past the item, or `offset` unchanged if
/// nothing valid could be decoded there.
#[must_use]
pub fn decode_at(stream: &Stream, offset: usize) -> usize {
	decode_at_depth(stream, offset, 0)
}

fn decode_at_depth(stream: &Stream, offset: usize, depth: usize) -> usize {
	if depth > MAX_DEPTH {
		log::warn!("cbor_kit::walker: {}", DecodeFailure::RecursionLimitExceeded(MAX_DEPTH));
		return offset;
	}

	match major_type_at(stream, offset) {
		Some(MajorType::UnsignedInt | MajorType::NegativeInt) => {
			let (value, len) = deserialize_int64(stream, offset);
			if len == 0 {
				log::warn!("cbor_kit::walker: malformed integer at offset {offset}");
				return offset;
			}
			log::debug!("{:indent$}int {value}", "", indent = depth * 2);
			offset + len
		}
		Some(major @ (MajorType::ByteString | MajorType::TextString)) => {
			let (len, head_len) = decode_head(stream, offset);
			let len = len as usize;
			if head_len == 0 || offset + head_len + len > stream.position() {
				log::warn!("cbor_kit::walker: truncated string at offset {offset}");
				return offset;
			}
			log::debug!(
				"{:indent$}{} ({len} bytes)",
				"",
				if major == MajorType::ByteString { "bytes" } else { "text" },
				indent = depth * 2
			);
			offset + head_len + len
		}
		Some(MajorType::Array) => {
			let (length, head_len) = deserialize_array(stream, offset);
			if head_len == 0 {
				log::warn!("cbor_kit::walker: malformed array header at offset {offset}");
				return offset;
			}
			log::debug!("{:indent$}array ({length:?})", "", indent = depth * 2);
			walk_container_items(stream, offset + head_len, depth, length, 1)
		}
		Some(MajorType::Map) => {
			let (length, head_len) = deserialize_map(stream, offset);
			if head_len == 0 {
				log::warn!("cbor_kit::walker: malformed map header at offset {offset}");
				return offset;
			}
			log::debug!("{:indent$}map ({length:?})", "", indent = depth * 2);
			walk_container_items(stream, offset + head_len, depth, length, 2)
		}
		Some(MajorType::Tag) => {
			let (value, len) = tag::deserialize_tag(stream, offset);
			if len == 0 {
				log::warn!("cbor_kit::walker: malformed tag at offset {offset}");
				return offset;
			}
			log::debug!("{:indent$}tag {value}", "", indent = depth * 2);
			decode_known_tag(stream, offset, len, value, depth)
		}
		Some(MajorType::Simple) => decode_simple(stream, offset, depth),
		None => {
			log::warn!("cbor_kit::walker: offset {offset} is out of bounds");
			offset
		}
	}
}

/// Walks `count_per_item` items per container entry (1 for an array, 2 for
/// a map's key/value pairs), either `length` times for a definite
/// container or until a break marker for an indefinite one.
fn walk_container_items(
	stream: &Stream,
	mut offset: usize,
	depth: usize,
	length: Length,
	count_per_item: usize,
) -> usize {
	match length {
		Length::Definite(entries) => {
			for _ in 0..entries * count_per_item as u64 {
				offset = decode_at_depth(stream, offset, depth + 1);
			}
			offset
		}
		Length::Indefinite => {
			loop {
				// `at_end` is checked before the literal break byte (rather
				// than via `at_break`, which folds both together) so a
				// truncated stream is reported as unterminated instead of
				// being treated as an implicit break.
				if at_end(stream, offset) {
					log::warn!("cbor_kit::walker: unterminated indefinite-length container");
					return offset;
				}
				if stream.written().get(offset) == Some(&BREAK) {
					return offset + 1;
				}
				for _ in 0..count_per_item {
					offset = decode_at_depth(stream, offset, depth + 1);
				}
			}
		}
	}
}

/// Decodes the item a tag applies to if the tag number is one this crate
/// understands (the two datetime tags); otherwise leaves it alone and
/// reports `"unknown content"`, consuming only the tag head itself so the
/// tagged item is decoded fresh as the next top-level step.
fn decode_known_tag(stream: &Stream, offset: usize, tag_head_len: usize, tag_value: u64, depth: usize) -> usize {
	#[cfg(feature = "datetime")]
	{
		use crate::tag::{TAG_DATETIME_EPOCH, TAG_DATETIME_TEXT};

		if tag_value == TAG_DATETIME_TEXT {
			let (datetime, total) = crate::datetime::deserialize_datetime_text(stream, offset);
			if let Some(datetime) = datetime {
				log::debug!("{:indent$}datetime {datetime}", "", indent = (depth + 1) * 2);
				return offset + total;
			}
		} else if tag_value == TAG_DATETIME_EPOCH {
			let (datetime, total) = crate::datetime::deserialize_datetime_epoch(stream, offset);
			if let Some(datetime) = datetime {
				log::debug!("{:indent$}datetime {datetime}", "", indent = (depth + 1) * 2);
				return offset + total;
			}
		}
	}

	log::debug!("{:indent$}unknown content", "", indent = (depth + 1) * 2);
	offset + tag_head_len
}

fn decode_simple(stream: &Stream, offset: usize, depth: usize) -> usize {
	let Some(&initial) = stream.written().get(offset) else {
		return offset;
	};

	match initial & ADDITIONAL_INFO_MASK {
		20 => log_simple(depth, "false", offset + 1),
		21 => log_simple(depth, "true", offset + 1),
		22 => log_simple(depth, "null", offset + 1),
		23 => log_simple(depth, "undefined", offset + 1),
		24 => match stream.written().get(offset + 1) {
			Some(&value) => {
				log::debug!("{:indent$}simple({value})", "", indent = depth * 2);
				offset + 2
			}
			None => {
				log::warn!("cbor_kit::walker: truncated extended simple value at offset {offset}");
				offset
			}
		},
		25 => {
			let (value, len) = float::deserialize_float_half(stream, offset);
			log::debug!("{:indent$}float16 {value}", "", indent = depth * 2);
			if len == 0 { offset } else { offset + len }
		}
		26 => {
			let (value, len) = float::deserialize_float(stream, offset);
			log::debug!("{:indent$}float32 {value}", "", indent = depth * 2);
			if len == 0 { offset } else { offset + len }
		}
		27 => {
			let (value, len) = float::deserialize_double(stream, offset);
			log::debug!("{:indent$}float64 {value}", "", indent = depth * 2);
			if len == 0 { offset } else { offset + len }
		}
		ai => {
			log::debug!("{:indent$}simple({ai})", "", indent = depth * 2);
			offset + 1
		}
	}
}

fn log_simple(depth: usize, name: &str, next: usize) -> usize {
	log::debug!("{:indent$}{name}", "", indent = depth * 2);
	next
}

/// Renders `stream`'s written region as a space-separated hex dump, for
/// logging alongside [`decode_all`]'s structural trace.
#[must_use]
pub fn to_hex_string(stream: &Stream) -> String {
	stream
		.written()
		.iter()
		.map(|byte| format!("{byte:02x}"))
		.collect::<Vec<_>>()
		.join(" ")
}

/// Logs a hex dump of `stream` followed by its full structural walk.
pub fn stream_print(stream: &Stream) {
	log::info!("cbor_kit::walker: {}", to_hex_string(stream));
	decode_all(stream);
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::container::{serialize_array, serialize_array_indefinite, write_break};
	use crate::int::serialize_int64;

	#[test]
	fn walks_flat_array() {
		let _ = env_logger::try_init();

		let mut stream = Stream::new(16);
		serialize_array(&mut stream, 2);
		serialize_int64(&mut stream, 1);
		serialize_int64(&mut stream, -1);

		assert_eq!(decode_at(&stream, 0), stream.position());
	}

	#[test]
	fn walks_indefinite_array() {
		let mut stream = Stream::new(16);
		serialize_array_indefinite(&mut stream);
		serialize_int64(&mut stream, 7);
		write_break(&mut stream);

		assert_eq!(decode_at(&stream, 0), stream.position());
	}

	#[test]
	fn decode_all_stops_on_malformed_item() {
		let mut buf = [0x1Cu8]; // reserved additional info
		let stream = Stream::over(&mut buf);
		decode_all(&stream); // must not panic or loop forever
	}

	#[test]
	fn hex_string_matches_bytes() {
		let mut stream = Stream::new(4);
		serialize_int64(&mut stream, 10);
		assert_eq!(to_hex_string(&stream), "0a");
	}
}
