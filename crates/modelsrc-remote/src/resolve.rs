use crate::{ManifestSource, RemoteError};
use modelsrc_schema::{plan_sources, ModelReference, SourceEntry};

/// Fetch the manifest for `reference` and expand it into its source list.
///
/// Either the whole list is produced or an error is returned; there is no
/// partial result.
pub fn resolve_sources(
    source: &dyn ManifestSource,
    reference: &ModelReference,
) -> Result<Vec<SourceEntry>, RemoteError> {
    let manifest = source.fetch_manifest(reference)?;
    let entries = plan_sources(&manifest, source.base_url(), reference);
    tracing::debug!(
        "{reference}: {} layer(s), config {}, {} source entr{}",
        manifest.layers.len(),
        if manifest.has_config() { "present" } else { "absent" },
        entries.len(),
        if entries.len() == 1 { "y" } else { "ies" },
    );
    Ok(entries)
}
