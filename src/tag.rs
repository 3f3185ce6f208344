// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tags (major type 6): a single head carrying a tag number, prefixing the
//! item it applies to.
//!
//! The underlying head codec already encodes any `u64` argument at its
//! minimum width, so unlike a fixed small-tag-number scheme, every tag
//! value up to `u64::MAX` is supported uniformly — there's no separate
//! path for tag numbers that don't fit in a byte.

use crate::error::DecodeFailure;
use crate::head::{decode_head, encode_head, major_type_at, MajorType};
use crate::Stream;

/// RFC 3339 text datetime, tag 0.
pub const TAG_DATETIME_TEXT: u64 = 0;
/// Epoch-based (seconds since 1970-01-01) datetime, tag 1.
pub const TAG_DATETIME_EPOCH: u64 = 1;

/// Serializes a tag head for `tag`. The caller writes the tagged item
/// immediately afterward.
pub fn serialize_tag(stream: &mut Stream, tag: u64) -> usize {
	encode_head(stream, MajorType::Tag, tag)
}

/// Deserializes the tag number at `offset`. Fails if the item there isn't
/// major type 6.
#[must_use]
pub fn deserialize_tag(stream: &Stream, offset: usize) -> (u64, usize) {
	match major_type_at(stream, offset) {
		Some(MajorType::Tag) => decode_head(stream, offset),
		Some(found) => {
			log::debug!(
				"cbor_kit::tag: {}",
				DecodeFailure::MajorTypeMismatch { expected: MajorType::Tag, found, offset }
			);
			(0, 0)
		}
		None => (0, 0),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn small_and_large_tags_round_trip() {
		for &tag in &[0u64, 1, 23, 24, 1000, u64::from(u32::MAX), u64::MAX] {
			let mut stream = Stream::new(16);
			let written = serialize_tag(&mut stream, tag);
			assert!(written > 0);
			assert_eq!(deserialize_tag(&stream, 0), (tag, written));
		}
	}

	#[test]
	fn type_mismatch_fails() {
		let mut stream = Stream::new(16);
		crate::head::encode_head(&mut stream, MajorType::UnsignedInt, 0);
		assert_eq!(deserialize_tag(&stream, 0), (0, 0));
	}
}
