use crate::{ManifestSource, RegistryConfig, RemoteError};
use modelsrc_schema::{resolve_manifest_url, Manifest, ModelReference};
use std::io::Read;

/// Manifest media types offered in the `Accept` header.
const MANIFEST_ACCEPT: &str = "application/vnd.docker.distribution.manifest.v2+json, \
application/vnd.oci.image.manifest.v1+json, application/json;q=0.5";

/// Blocking registry client.
///
/// Issues a single `GET <base>/v2/library/<repository>/manifests/<tag>` per
/// lookup. The agent's global timeout bounds the whole request, connection
/// setup and body included. Only `200 OK` bodies are decoded.
pub struct HttpRegistry {
    config: RegistryConfig,
    agent: ureq::Agent,
}

impl HttpRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(config.timeout()))
            .http_status_as_error(false)
            .build()
            .into();
        Self { config, agent }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    fn transport_error(&self, url: &str, timed_out: bool, detail: String) -> RemoteError {
        let reason = if timed_out {
            format!("timed out after {}s", self.config.timeout_secs)
        } else {
            detail
        };
        RemoteError::Transport {
            url: url.to_owned(),
            reason,
            timed_out,
        }
    }

    fn do_get(&self, url: &str) -> Result<Vec<u8>, RemoteError> {
        let resp = self
            .agent
            .get(url)
            .header("Accept", MANIFEST_ACCEPT)
            .header(
                "User-Agent",
                &format!("modelsrc/{}", env!("CARGO_PKG_VERSION")),
            )
            .call()
            .map_err(|e| {
                let timed_out = is_timeout(&e);
                self.transport_error(url, timed_out, e.to_string())
            })?;

        let status = resp.status();
        if status != ureq::http::StatusCode::OK {
            let status = format!(
                "{} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or_default()
            );
            return Err(RemoteError::UnexpectedStatus {
                url: url.to_owned(),
                status: status.trim_end().to_owned(),
            });
        }

        let mut reader = resp.into_body().into_reader();
        let mut body = Vec::new();
        reader.read_to_end(&mut body).map_err(|e| {
            let timed_out = e.kind() == std::io::ErrorKind::TimedOut
                || e
                    .get_ref()
                    .and_then(|inner| inner.downcast_ref::<ureq::Error>())
                    .is_some_and(is_timeout);
            self.transport_error(url, timed_out, e.to_string())
        })?;
        Ok(body)
    }
}

fn is_timeout(err: &ureq::Error) -> bool {
    match err {
        ureq::Error::Timeout(_) => true,
        ureq::Error::Io(io) => io.kind() == std::io::ErrorKind::TimedOut,
        _ => false,
    }
}

impl ManifestSource for HttpRegistry {
    fn base_url(&self) -> &str {
        &self.config.url
    }

    fn fetch_manifest(&self, reference: &ModelReference) -> Result<Manifest, RemoteError> {
        let url = resolve_manifest_url(&self.config.url, &reference.repository, &reference.tag);
        tracing::debug!("GET {url}");
        let body = self.do_get(&url)?;
        tracing::debug!("received {} byte manifest for {reference}", body.len());
        Manifest::from_slice(&body).map_err(|e| RemoteError::Decode {
            url,
            reason: e.to_string(),
        })
    }
}
