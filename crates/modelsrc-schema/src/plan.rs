use crate::manifest::Manifest;
use crate::reference::ModelReference;
use crate::url::{resolve_blob_url, resolve_manifest_url};
use serde::{Deserialize, Serialize};

/// Reserved filename for the manifest document itself.
pub const MANIFEST_FILENAME: &str = "manifest.json";

/// One downloadable artifact: a local filename and the URL it comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEntry {
    pub filename: String,
    pub url: String,
}

impl SourceEntry {
    pub fn is_manifest(&self) -> bool {
        self.filename == MANIFEST_FILENAME
    }

    /// Render the entry the way a recipe source array lists it.
    ///
    /// The manifest is written as `manifest.json::<url>`; blobs are bare URLs,
    /// their digest-derived filename being recoverable from the last path
    /// segment.
    pub fn source_line(&self) -> String {
        if self.is_manifest() {
            format!("{}::{}", self.filename, self.url)
        } else {
            self.url.clone()
        }
    }
}

/// Expand a manifest into its ordered source list.
///
/// Order is fixed: config blob (when its digest is non-empty), then layers in
/// manifest order, then the manifest document last.
pub fn plan_sources(manifest: &Manifest, base: &str, reference: &ModelReference) -> Vec<SourceEntry> {
    let mut entries: Vec<SourceEntry> = manifest
        .blob_digests()
        .map(|digest| SourceEntry {
            filename: digest.to_filename(),
            url: resolve_blob_url(base, &reference.repository, digest),
        })
        .collect();

    entries.push(SourceEntry {
        filename: MANIFEST_FILENAME.to_owned(),
        url: resolve_manifest_url(base, &reference.repository, &reference.tag),
    });
    entries
}
