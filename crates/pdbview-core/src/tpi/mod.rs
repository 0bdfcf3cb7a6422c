//! # TPI Stream Access
//!
//! The seam between the resolver and whatever decoded the TPI stream:
//! indexed record lookup, per-kind listings and the optional hash buckets
//! used to repair forward references.

mod hash;
mod stream;

pub use hash::{hash_string_v1, HashTable};
pub use stream::{TpiStream, TpiStreamBuilder, TypeRecordProvider};
