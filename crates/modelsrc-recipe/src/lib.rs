//! In-place rewriting of build-recipe source arrays.
//!
//! A recipe (conventionally a `PKGBUILD`) declares its downloads as a shell
//! array, `source=( ... )`. This crate finds that array by scanning for its
//! open and close markers and replaces only the span between them, leaving
//! every other byte of the file untouched. Bytes outside the array are
//! opaque, so recipes need not be UTF-8. Rewrites are idempotent.

pub mod file;
pub mod patch;

pub use file::{check_file, patch_file, PatchOutcome, DEFAULT_RECIPE};
pub use patch::{
    locate_array, locate_array_bytes, patch_source_array, patch_source_bytes, render_array,
    ArraySpan, SOURCE_KEY,
};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("no '{key}=(' array found in recipe")]
    AnchorNotFound { key: String },
    #[error("'{key}=(' opened on line {line} is never closed")]
    UnclosedArray { key: String, line: usize },
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
