use crate::types::Digest;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to decode manifest: {0}")]
    Decode(#[from] serde_json::Error),
}

// `null` decodes like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// One content-addressed blob referenced by a manifest.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    #[serde(default, deserialize_with = "null_as_default")]
    pub digest: Digest,
    #[serde(default, deserialize_with = "null_as_default")]
    pub size: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub media_type: String,
}

/// A registry manifest: one config blob plus an ordered list of layers.
///
/// Unknown fields are ignored. A missing or `null` `config` (or a config
/// without a digest) decodes to an empty digest, meaning "no config layer".
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub schema_version: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub media_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub config: Layer,
    #[serde(default, deserialize_with = "null_as_default")]
    pub layers: Vec<Layer>,
}

impl Manifest {
    pub fn from_slice(data: &[u8]) -> Result<Self, ManifestError> {
        Ok(serde_json::from_slice(data)?)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn has_config(&self) -> bool {
        !self.config.digest.is_empty()
    }

    /// Blob digests in download order: the config first (when present),
    /// then every layer as declared.
    pub fn blob_digests(&self) -> impl Iterator<Item = &Digest> {
        let config = self.has_config().then_some(&self.config.digest);
        config
            .into_iter()
            .chain(self.layers.iter().map(|l| &l.digest))
    }
}
