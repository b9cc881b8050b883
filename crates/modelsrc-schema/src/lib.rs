//! Registry manifest model and source planning for modelsrc.
//!
//! This crate is the pure layer: the `Digest` newtype and its filename
//! encoding, the JSON manifest model (`Manifest`, `Layer`), model reference
//! parsing (`ModelReference`), registry URL resolution, and the planner that
//! expands a manifest into an ordered list of `SourceEntry` values.
//! Nothing in here touches the network or the filesystem.

pub mod manifest;
pub mod plan;
pub mod reference;
pub mod types;
pub mod url;

pub use manifest::{Layer, Manifest, ManifestError};
pub use plan::{plan_sources, SourceEntry, MANIFEST_FILENAME};
pub use reference::{parse_model_path, ModelReference, ReferenceError, DEFAULT_TAG};
pub use types::Digest;
pub use url::{resolve_blob_url, resolve_manifest_url};
