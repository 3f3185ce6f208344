// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tag 0 (RFC 3339 text) and tag 1 (epoch seconds) datetimes, gated behind
//! the `datetime` feature.
//!
//! Epoch datetimes serialize as an unsigned integer when they carry no
//! sub-second precision, falling back to a double-precision float for
//! fractional seconds; either form is rejected on serialize if negative,
//! since this codec only represents dates at or after the Unix epoch. Text
//! datetimes have no such restriction. Both still round-trip through
//! [`crate::walker`] as opaque tagged items even with this feature
//! disabled.

use chrono::{DateTime, TimeZone, Utc};

use crate::error::DecodeFailure;
use crate::float::{deserialize_double, serialize_double};
use crate::head::head_len;
use crate::int::{deserialize_uint64, serialize_uint64};
use crate::tag::{deserialize_tag, serialize_tag, TAG_DATETIME_EPOCH, TAG_DATETIME_TEXT};
use crate::Stream;

/// Serializes `value` as a tag-0 RFC 3339 text datetime.
pub fn serialize_datetime_text(stream: &mut Stream, value: &DateTime<Utc>) -> usize {
	let text = value.to_rfc3339();
	let needed = head_len(TAG_DATETIME_TEXT) + head_len(text.len() as u64) + text.len();
	if stream.remaining() < needed {
		return 0;
	}

	serialize_tag(stream, TAG_DATETIME_TEXT);
	crate::bytestring::serialize_text_string(stream, &text);
	needed
}

/// Deserializes a tag-0 text datetime at `offset`.
#[must_use]
pub fn deserialize_datetime_text(stream: &Stream, offset: usize) -> (Option<DateTime<Utc>>, usize) {
	let (tag, tag_len) = deserialize_tag(stream, offset);
	if tag_len == 0 || tag != TAG_DATETIME_TEXT {
		return (None, 0);
	}

	let mut buf = [0u8; 64];
	let str_len = crate::bytestring::deserialize_text_string(stream, offset + tag_len, &mut buf);
	if str_len == 0 {
		return (None, 0);
	}

	let nul = buf.iter().position(|&byte| byte == 0).unwrap_or(buf.len());
	let Ok(text) = core::str::from_utf8(&buf[..nul]) else {
		return (None, 0);
	};

	match DateTime::parse_from_rfc3339(text) {
		Ok(datetime) => (Some(datetime.with_timezone(&Utc)), tag_len + str_len),
		Err(error) => {
			log::debug!("cbor_kit::datetime: {}", DecodeFailure::Datetime(error));
			(None, 0)
		}
	}
}

/// Serializes `seconds` (seconds since the Unix epoch) as a tag-1 epoch
/// datetime. Fails if `seconds` is negative.
///
/// Whole-second values are written as an unsigned integer (the wire form
/// spec §4.3 mandates); fractional seconds fall back to the
/// double-precision form so sub-second precision is still representable.
pub fn serialize_datetime_epoch(stream: &mut Stream, seconds: f64) -> usize {
	if seconds < 0.0 {
		log::debug!(
			"cbor_kit::datetime: {}",
			DecodeFailure::NegativeEpoch(seconds as i64)
		);
		return 0;
	}

	if seconds.fract() == 0.0 && seconds <= u64::MAX as f64 {
		let whole = seconds as u64;
		let needed = head_len(TAG_DATETIME_EPOCH) + head_len(whole);
		if stream.remaining() < needed {
			return 0;
		}
		serialize_tag(stream, TAG_DATETIME_EPOCH);
		serialize_uint64(stream, whole);
		return needed;
	}

	let needed = head_len(TAG_DATETIME_EPOCH) + 9; // tag head + fixed-width double
	if stream.remaining() < needed {
		return 0;
	}

	serialize_tag(stream, TAG_DATETIME_EPOCH);
	serialize_double(stream, seconds);
	needed
}

/// Deserializes a tag-1 epoch datetime at `offset`.
///
/// Tries the unsigned-integer wire form first (the form spec §4.3
/// mandates), falling back to the double-precision form for payloads
/// carrying sub-second precision.
#[must_use]
pub fn deserialize_datetime_epoch(stream: &Stream, offset: usize) -> (Option<DateTime<Utc>>, usize) {
	let (tag, tag_len) = deserialize_tag(stream, offset);
	if tag_len == 0 || tag != TAG_DATETIME_EPOCH {
		return (None, 0);
	}

	let (whole, uint_len) = deserialize_uint64(stream, offset + tag_len);
	if uint_len > 0 {
		if whole > i64::MAX as u64 {
			return (None, 0);
		}
		return match Utc.timestamp_opt(whole as i64, 0).single() {
			Some(datetime) => (Some(datetime), tag_len + uint_len),
			None => (None, 0),
		};
	}

	let (seconds, float_len) = deserialize_double(stream, offset + tag_len);
	if float_len == 0 || seconds < 0.0 {
		return (None, 0);
	}

	let whole = seconds.trunc() as i64;
	let nanos = (seconds.fract() * 1e9).round() as u32;
	match Utc.timestamp_opt(whole, nanos).single() {
		Some(datetime) => (Some(datetime), tag_len + float_len),
		None => (None, 0),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn text_round_trip() {
		let value = Utc.with_ymd_and_hms(2013, 3, 21, 20, 4, 0).unwrap();
		let mut stream = Stream::new(64);
		let written = serialize_datetime_text(&mut stream, &value);
		assert!(written > 0);

		let (decoded, read) = deserialize_datetime_text(&stream, 0);
		assert_eq!(read, written);
		assert_eq!(decoded, Some(value));
	}

	#[test]
	fn epoch_round_trip_whole_seconds_uses_integer_form() {
		let mut stream = Stream::new(32);
		let written = serialize_datetime_epoch(&mut stream, 1_363_896_240.0);
		assert!(written > 0);
		// major 6 tag head (1 byte, tag 1) + major 0 uint32 head (5 bytes)
		assert_eq!(stream.written()[1] >> 5, 0);

		let (decoded, read) = deserialize_datetime_epoch(&stream, 0);
		assert_eq!(read, written);
		assert_eq!(decoded.map(|dt| dt.timestamp()), Some(1_363_896_240));
	}

	#[test]
	fn epoch_round_trip_fractional_seconds_uses_double_form() {
		let mut stream = Stream::new(32);
		let written = serialize_datetime_epoch(&mut stream, 1_363_896_240.5);
		assert!(written > 0);
		// major 6 tag head (1 byte) + major 7 double head (9 bytes)
		assert_eq!(stream.written()[1] >> 5, 7);

		let (decoded, read) = deserialize_datetime_epoch(&stream, 0);
		assert_eq!(read, written);
		assert_eq!(decoded.map(|dt| dt.timestamp()), Some(1_363_896_240));
	}

	#[test]
	fn negative_epoch_rejected() {
		let mut stream = Stream::new(32);
		assert_eq!(serialize_datetime_epoch(&mut stream, -1.0), 0);
		assert_eq!(stream.position(), 0);
	}

	#[test]
	fn wrong_tag_fails() {
		let mut stream = Stream::new(32);
		serialize_datetime_epoch(&mut stream, 0.0);
		assert_eq!(deserialize_datetime_text(&stream, 0), (None, 0));
	}
}
