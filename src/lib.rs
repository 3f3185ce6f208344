// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Deny the following clippy lints to enforce them:
#![deny(clippy::complexity)]
#![deny(clippy::correctness)]
#![deny(clippy::perf)]
#![deny(clippy::style)]
#![deny(clippy::suspicious)]
// Warn for these lints, rather than denying them.
#![warn(clippy::use_self)]
#![warn(clippy::pedantic)]
// Continue to allow these though.
#![allow(clippy::doc_markdown)]
#![allow(clippy::wildcard_imports)]
#![allow(clippy::module_name_repetitions)]
#![warn(missing_docs)]

//! # cbor-kit
//!
//! A CBOR ([RFC 7049](https://www.rfc-editor.org/rfc/rfc7049)) codec for
//! constrained environments: items are serialized into and deserialized out
//! of a caller-provided byte buffer, there is no heap allocation on the
//! serialize/deserialize hot path, and every write is bounds-checked.
//!
//! cbor-kit is *not* a `serde` backend and does not provide schema
//! validation or canonical-form enforcement. It provides the four layers a
//! from-scratch CBOR implementation needs:
//!
//! - [`stream`]: the buffer and cursor ([`Stream`]).
//! - [`head`]: the variable-width initial-byte-plus-argument encoding shared
//!   by every major type.
//! - the typed layer: [`int`], [`boolean`], [`float`], [`bytestring`],
//!   [`container`], [`tag`], and (optionally) [`datetime`].
//! - [`walker`]: a recursive, non-validating diagnostic decoder.
//!
//! Every serialize/deserialize operation returns the number of bytes
//! written or read; `0` always signals failure (buffer exhaustion on write,
//! major-type mismatch or malformed head on read) and the stream/output is
//! left untouched. No operation panics on malformed input.

pub mod boolean;
pub mod bytestring;
pub mod container;
#[cfg(feature = "datetime")]
pub mod datetime;
pub mod error;
pub mod float;
pub mod head;
pub mod int;
pub mod stream;
pub mod tag;
pub mod walker;

pub use error::DecodeFailure;
pub use head::{MajorType, SimpleValue};
pub use stream::Stream;
