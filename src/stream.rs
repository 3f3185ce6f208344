// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The [`Stream`] buffer and cursor.

use bytes::{Buf, BufMut};

/// A CBOR-encoded byte buffer plus a write/read cursor.
///
/// `position` is both the index of the next free byte (the write cursor)
/// and the logical length of written content: reads only ever look at
/// `[0, position)`.
///
/// `Stream` is a sum type over who owns the backing storage, per the design
/// notes on borrowed vs. owned buffers: a stream constructed with
/// [`Stream::new`] owns a heap allocation and frees it when dropped; a
/// stream constructed with [`Stream::over`] borrows a caller-owned slice
/// and never frees anything. There is no explicit `destroy` operation —
/// `Drop` does the right thing for either variant, which also means the
/// double-free hazard of owning two destroy paths over the same buffer
/// can't arise.
pub enum Stream<'a> {
	/// An internally-allocated buffer.
	Owned {
		/// Backing storage.
		data: Vec<u8>,
		/// Write/read cursor.
		position: usize,
	},
	/// A caller-owned buffer, borrowed for the lifetime of the stream.
	Borrowed {
		/// Backing storage.
		data: &'a mut [u8],
		/// Write/read cursor.
		position: usize,
	},
}

impl<'a> Stream<'a> {
	/// Allocates a new stream with `capacity` bytes of backing storage.
	///
	/// A `capacity` of zero is valid: the allocation is skipped (an empty
	/// `Vec` never allocates) and every subsequent write will fail with `0`
	/// bytes written, per the buffer-full law.
	#[must_use]
	pub fn new(capacity: usize) -> Self {
		Self::Owned {
			data: vec![0u8; capacity],
			position: 0,
		}
	}

	/// Adopts a caller-owned buffer. The stream never reallocates or frees
	/// it.
	#[must_use]
	pub fn over(buffer: &'a mut [u8]) -> Self {
		Self::Borrowed {
			data: buffer,
			position: 0,
		}
	}

	/// Resets the write/read cursor to zero. The backing buffer's contents
	/// are left as-is; they are simply no longer part of `written()`.
	pub fn clear(&mut self) {
		*self.position_mut() = 0;
	}

	/// The total number of bytes the backing buffer can hold.
	#[must_use]
	pub fn capacity(&self) -> usize {
		self.data().len()
	}

	/// The current cursor position: the number of bytes written so far.
	#[must_use]
	pub fn position(&self) -> usize {
		match self {
			Self::Owned { position, .. } | Self::Borrowed { position, .. } => *position,
		}
	}

	/// The number of free bytes left before the buffer is full.
	#[must_use]
	pub fn remaining(&self) -> usize {
		self.capacity() - self.position()
	}

	/// The written portion of the buffer, `[0, position)`.
	#[must_use]
	pub fn written(&self) -> &[u8] {
		&self.data()[..self.position()]
	}

	fn data(&self) -> &[u8] {
		match self {
			Self::Owned { data, .. } => data,
			Self::Borrowed { data, .. } => data,
		}
	}

	fn data_mut(&mut self) -> &mut [u8] {
		match self {
			Self::Owned { data, .. } => data,
			Self::Borrowed { data, .. } => data,
		}
	}

	fn position_mut(&mut self) -> &mut usize {
		match self {
			Self::Owned { position, .. } | Self::Borrowed { position, .. } => position,
		}
	}

	/// The unwritten tail of the buffer, as a [`bytes::BufMut`], for the
	/// typed layer to write fixed-width big-endian values into.
	pub(crate) fn tail_mut(&mut self) -> &mut [u8] {
		let position = self.position();
		&mut self.data_mut()[position..]
	}

	/// Advances the cursor by `n` bytes after a write has already placed
	/// `n` bytes at the old `tail_mut()`. Callers must have checked
	/// `remaining() >= n` first; this never fails.
	pub(crate) fn advance(&mut self, n: usize) {
		*self.position_mut() += n;
	}

	/// Writes `value` at the current cursor and advances past it, without
	/// any bounds check. Callers must have reserved the space first.
	pub(crate) fn put_raw(&mut self, value: &[u8]) {
		self.tail_mut().put(value);
		self.advance(value.len());
	}
}

/// Reads a big-endian `u16` out of `data` at `offset`, or `None` if there
/// aren't two bytes there.
pub(crate) fn read_u16(data: &[u8], offset: usize) -> Option<u16> {
	data.get(offset..offset + 2).map(|mut s| s.get_u16())
}

/// Reads a big-endian `u32` out of `data` at `offset`, or `None` if there
/// aren't four bytes there.
pub(crate) fn read_u32(data: &[u8], offset: usize) -> Option<u32> {
	data.get(offset..offset + 4).map(|mut s| s.get_u32())
}

/// Reads a big-endian `u64` out of `data` at `offset`, or `None` if there
/// aren't eight bytes there.
pub(crate) fn read_u64(data: &[u8], offset: usize) -> Option<u64> {
	data.get(offset..offset + 8).map(|mut s| s.get_u64())
}

#[cfg(test)]
mod tests {
	use super::Stream;

	#[test]
	fn owned_starts_empty() {
		let stream = Stream::new(16);
		assert_eq!(stream.capacity(), 16);
		assert_eq!(stream.position(), 0);
		assert_eq!(stream.remaining(), 16);
		assert!(stream.written().is_empty());
	}

	#[test]
	fn zero_capacity_is_valid() {
		let stream = Stream::new(0);
		assert_eq!(stream.capacity(), 0);
		assert_eq!(stream.remaining(), 0);
	}

	#[test]
	fn clear_resets_position_not_buffer() {
		let mut stream = Stream::new(4);
		stream.put_raw(&[1, 2]);
		assert_eq!(stream.position(), 2);
		stream.clear();
		assert_eq!(stream.position(), 0);
		assert_eq!(stream.capacity(), 4);
	}

	#[test]
	fn borrowed_over_caller_buffer() {
		let mut buf = [0u8; 8];
		let mut stream = Stream::over(&mut buf);
		stream.put_raw(&[0xAB]);
		assert_eq!(stream.written(), &[0xAB]);
	}
}
