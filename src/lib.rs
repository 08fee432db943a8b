// Copyright 2025-2026 cilweave contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![deny(missing_docs)]

//! # cilweave
//!
//! A build-time mixin weaver core for managed assemblies. `cilweave` takes a
//! "source" type defined in one module and composes it into a designated
//! "target" type in another: the target gains the source's fields, methods,
//! properties, events, nested types, generic parameters, custom attributes,
//! and executable bodies, and the IL instruction stream is rewritten so that
//! every reference that previously pointed into the source module resolves
//! within the target module, with mixin-cloned members substituted where a
//! corresponding target member exists.
//!
//! # Architecture
//!
//! The crate is organized around a graph-based cloner:
//!
//! - **Metadata Layer** ([`crate::metadata`]): arena-owned object model of
//!   one module's types, members, and IL, with canonical full-name rendering
//!   and an ordinary importer for non-mixin references.
//! - **Graph Layer** ([`crate::graph`]): the clone graph over entities
//!   reachable from the source root, with parent/child, sibling, and
//!   dependency edge sets and a stable topological scheduler.
//! - **Weave Layer** ([`crate::weave`]): the cloner registry with its
//!   discovery gate, per-kind two-phase cloners, the root-import reference
//!   rewriting engine, and the driver running the creation and population
//!   passes.
//!
//! # Key Components
//!
//! - [`Weaver`] - Main entry point: drives one weave end to end
//! - [`WeaveOptions`] - Skip marker and meta-attribute filtering
//! - [`crate::metadata::Module`] - The mutable module object model
//! - [`crate::graph::IlGraph`] - The three-edge-flavor clone graph
//! - [`crate::weave::RootImporter`] - Reference substitution with caches
//! - [`crate::prelude`] - Convenient re-exports of commonly used types
//! - [`Error`] and [`Result`] - Typed, fatal-only error handling
//!
//! # Usage Example
//!
//! ```rust
//! use cilweave::prelude::*;
//!
//! // Build a source module with a mixin type carrying one field.
//! let mut source = Module::new("MixLib", "MixLib.dll");
//! let mixin = source.add_type(TypeDef::new("Mix", "Counter", TypeAttributes::PUBLIC));
//! source.add_field(FieldDef {
//!     name: "count".to_string(),
//!     attributes: FieldAttributes::PRIVATE,
//!     field_type: TypeRef::core("System.Int32"),
//!     constant: None,
//!     marshal: None,
//!     offset: None,
//!     custom_attributes: Vec::new(),
//!     declaring: mixin,
//! });
//!
//! // Weave it into a target type in another module.
//! let mut target = Module::new("App", "App.dll");
//! target.add_type(TypeDef::new("App", "Widget", TypeAttributes::PUBLIC));
//! Weaver::new(&source, &mut target, WeaveOptions::new())
//!     .weave("Mix.Counter", "App.Widget")?;
//!
//! let widget = target.type_by_name("App.Widget").unwrap();
//! assert_eq!(target.type_(widget).fields.len(), 1);
//! # Ok::<(), cilweave::Error>(())
//! ```
//!
//! # Determinism
//!
//! A weave is single-threaded and deterministic: identical inputs yield
//! identical target object models. Stability of the topological scheduler
//! and insertion-ordered edge iteration are load-bearing for this guarantee.
//!
//! # Scope
//!
//! Assembly file I/O, symbol (debug) information, build-host integration,
//! and configuration loading are external concerns; this crate operates on
//! the in-memory object model only and never mutates the source module.

mod error;

/// Shared functionality which is used in unit- and integration-tests
#[cfg(test)]
pub(crate) mod test;

pub mod graph;
pub mod metadata;
pub mod prelude;
pub mod weave;

pub use error::Error;
pub use weave::{WeaveOptions, Weaver};

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
