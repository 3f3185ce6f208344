// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floats: major type 7, additional information 25 (half, `f16`), 26
//! (single, `f32`) and 27 (double, `f64`). Rust has no native `f16`, so the
//! half-precision operations convert through bit patterns directly: encode
//! takes and decode returns `f32`.

use crate::error::DecodeFailure;
use crate::head::{major_type_at, MajorType, ADDITIONAL_INFO_MASK};
use crate::Stream;

const AI_HALF: u8 = 25;
const AI_SINGLE: u8 = 26;
const AI_DOUBLE: u8 = 27;

fn write_head_fixed(stream: &mut Stream, ai: u8, payload: &[u8]) -> usize {
	let needed = 1 + payload.len();
	if stream.remaining() < needed {
		return 0;
	}

	stream.put_raw(&[MajorType::Simple.shifted() | ai]);
	stream.put_raw(payload);
	needed
}

fn read_payload(stream: &Stream, offset: usize, ai: u8, len: usize) -> Option<&[u8]> {
	match major_type_at(stream, offset) {
		Some(MajorType::Simple) => {}
		Some(found) => {
			log::debug!(
				"cbor_kit::float: {}",
				DecodeFailure::MajorTypeMismatch { expected: MajorType::Simple, found, offset }
			);
			return None;
		}
		None => return None,
	}

	let data = stream.written();
	let initial = *data.get(offset)?;
	if initial & ADDITIONAL_INFO_MASK != ai {
		return None;
	}

	data.get(offset + 1..offset + 1 + len)
}

/// Converts an `f32` to its nearest IEEE 754 binary16 bit pattern,
/// rounding the mantissa to the nearest representable half (ties round
/// up), and flushing values smaller than the smallest half subnormal to
/// zero, and values larger than the largest finite half to infinity.
fn f32_to_f16_bits(value: f32) -> u16 {
	let bits = value.to_bits();
	let sign = ((bits >> 16) & 0x8000) as u16;
	let exp = ((bits >> 23) & 0xff) as i32;
	let mantissa = bits & 0x007f_ffff;

	if exp == 0xff {
		// infinity or NaN
		let nan_bit = u16::from(mantissa != 0);
		return sign | 0x7c00 | nan_bit;
	}

	let unbiased = exp - 127;

	if unbiased > 15 {
		return sign | 0x7c00; // overflow -> infinity
	}
	if unbiased < -24 {
		return sign; // underflow -> signed zero
	}
	if unbiased < -14 {
		// subnormal half: shift the implicit-leading-1 mantissa down by
		// however many extra places the smaller exponent costs.
		let mantissa = mantissa | 0x0080_0000;
		let shift = (-unbiased - 1) as u32;
		let half = (mantissa >> shift) as u16;
		let round = ((mantissa >> (shift - 1)) & 1) as u16;
		return sign | (half + round);
	}

	let half_exp = (unbiased + 15) as u16;
	let half_mantissa = (mantissa >> 13) as u16;
	let round = ((mantissa >> 12) & 1) as u16;
	// a carry out of the mantissa bits on rounding correctly bumps the
	// exponent, since the two fields are laid out contiguously.
	sign | ((half_exp << 10) | half_mantissa).wrapping_add(round)
}

/// Converts an IEEE 754 binary16 bit pattern to the `f64` it denotes,
/// via the standard ldexp-style subnormal/normal reconstruction.
fn f16_bits_to_f64(bits: u16) -> f64 {
	let sign = if bits & 0x8000 != 0 { -1.0 } else { 1.0 };
	let exp = i32::from((bits >> 10) & 0x1f);
	let mantissa = f64::from(bits & 0x03ff);

	if exp == 0 {
		sign * mantissa * 2f64.powi(-24)
	} else if exp == 0x1f {
		if mantissa == 0.0 {
			sign * f64::INFINITY
		} else {
			f64::NAN
		}
	} else {
		sign * (1024.0 + mantissa) * 2f64.powi(exp - 25)
	}
}

/// Serializes `value` as a half-precision CBOR float.
pub fn serialize_float_half(stream: &mut Stream, value: f32) -> usize {
	write_head_fixed(stream, AI_HALF, &f32_to_f16_bits(value).to_be_bytes())
}

/// Deserializes a half-precision CBOR float at `offset`, widened to `f32`.
#[must_use]
pub fn deserialize_float_half(stream: &Stream, offset: usize) -> (f32, usize) {
	match read_payload(stream, offset, AI_HALF, 2) {
		Some(payload) => {
			let bits = u16::from_be_bytes([payload[0], payload[1]]);
			(f16_bits_to_f64(bits) as f32, 3)
		}
		None => (0.0, 0),
	}
}

/// Serializes `value` as a single-precision CBOR float.
pub fn serialize_float(stream: &mut Stream, value: f32) -> usize {
	write_head_fixed(stream, AI_SINGLE, &value.to_bits().to_be_bytes())
}

/// Deserializes a single-precision CBOR float at `offset`.
#[must_use]
pub fn deserialize_float(stream: &Stream, offset: usize) -> (f32, usize) {
	match read_payload(stream, offset, AI_SINGLE, 4) {
		Some(payload) => {
			let mut bits = [0u8; 4];
			bits.copy_from_slice(payload);
			(f32::from_bits(u32::from_be_bytes(bits)), 5)
		}
		None => (0.0, 0),
	}
}

/// Serializes `value` as a double-precision CBOR float.
pub fn serialize_double(stream: &mut Stream, value: f64) -> usize {
	write_head_fixed(stream, AI_DOUBLE, &value.to_bits().to_be_bytes())
}

/// Deserializes a double-precision CBOR float at `offset`.
#[must_use]
pub fn deserialize_double(stream: &Stream, offset: usize) -> (f64, usize) {
	match read_payload(stream, offset, AI_DOUBLE, 8) {
		Some(payload) => {
			let mut bits = [0u8; 8];
			bits.copy_from_slice(payload);
			(f64::from_bits(u64::from_be_bytes(bits)), 9)
		}
		None => (0.0, 0),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn double_round_trip() {
		for &value in &[0.0, 1.0, -1.0, 3.1415926535, f64::MIN, f64::MAX] {
			let mut stream = Stream::new(16);
			let written = serialize_double(&mut stream, value);
			assert_eq!(written, 9);
			assert_eq!(deserialize_double(&stream, 0), (value, 9));
		}
	}

	#[test]
	fn single_round_trip() {
		for &value in &[0.0f32, 1.0, -1.0, 3.5, f32::MIN, f32::MAX] {
			let mut stream = Stream::new(16);
			let written = serialize_float(&mut stream, value);
			assert_eq!(written, 5);
			assert_eq!(deserialize_float(&stream, 0), (value, 5));
		}
	}

	#[test]
	fn half_round_trip_exact_values() {
		for &value in &[0.0f32, 1.0, -1.0, 2.0, 0.5, -0.5] {
			let mut stream = Stream::new(16);
			let written = serialize_float_half(&mut stream, value);
			assert_eq!(written, 3);
			let (decoded, len) = deserialize_float_half(&stream, 0);
			assert_eq!(len, 3);
			assert!((decoded - value).abs() < f32::EPSILON);
		}
	}

	#[test]
	fn half_nan_sets_low_mantissa_bit_only() {
		let nan = f32::from_bits(0x7fc0_0000);
		assert_eq!(f32_to_f16_bits(nan), 0x7c01);
	}

	#[test]
	fn half_flushes_tiny_values_to_zero() {
		let tiny = f32::from_bits(1); // smallest positive f32 subnormal
		let mut stream = Stream::new(16);
		serialize_float_half(&mut stream, tiny);
		let (decoded, _) = deserialize_float_half(&stream, 0);
		assert_eq!(decoded, 0.0);
	}

	#[test]
	fn half_overflows_to_infinity() {
		let mut stream = Stream::new(16);
		serialize_float_half(&mut stream, f32::MAX);
		let (decoded, _) = deserialize_float_half(&stream, 0);
		assert!(decoded.is_infinite() && decoded.is_sign_positive());
	}

	#[test]
	fn major_type_mismatch_fails() {
		let mut stream = Stream::new(16);
		crate::head::encode_head(&mut stream, MajorType::UnsignedInt, 0);
		assert_eq!(deserialize_double(&stream, 0), (0.0, 0));
	}
}
