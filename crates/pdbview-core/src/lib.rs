//! # pdbview-core
//!
//! Lazy type resolution over the TPI (type information) stream of native
//! Windows PDB files.
//!
//! This crate provides:
//! - Binary decoding primitives for PDB record formats ([`binary`])
//! - The type index space and decoded record model ([`types`])
//! - Record providers and the TPI hash table ([`tpi`])
//! - A memoized type resolver with forward-reference repair ([`resolver`])
//!
//! ## What is left to the caller
//!
//! Locating the TPI stream inside the PDB container and decoding its bytes
//! into [`TypeRecord`](types::TypeRecord) values happen elsewhere. Hand the
//! decoded records to the resolver through
//! [`TypeRecordProvider`](tpi::TypeRecordProvider), for example with the
//! in-memory [`TpiStream`](tpi::TpiStream).
//!
//! ## Example
//!
//! ```rust
//! use pdbview_core::prelude::*;
//!
//! let mut builder = TpiStream::builder();
//! let stub = builder.push(ClassRecord::new(
//!     TagRecord::new(TypeLeafKind::LF_CLASS, "Widget").forward_reference(),
//!     0,
//! ));
//! let definition = builder.push(ClassRecord::new(TagRecord::new(TypeLeafKind::LF_CLASS, "Widget"), 24));
//!
//! let reader = PdbTypeReader::new(builder.build()?);
//! assert_eq!(reader.resolve(stub)?.record_index(), Some(definition));
//! assert_eq!(reader.user_defined_types()?.len(), 1);
//! # Ok::<(), PdbError>(())
//! ```

pub mod binary;
pub mod config;
pub mod error;
pub mod prelude;
pub mod resolver;
pub mod tpi;
pub mod types;

pub use config::ResolverConfig;
// Re-export commonly used types
pub use error::{PdbError, PdbResult};
pub use resolver::{PdbType, PdbTypeKind, PdbTypeReader};
pub use types::{TypeIndex, TypeRecord};
