//! Registry URL construction.
//!
//! Layout follows the registry v2 API under the `library` namespace:
//! `<base>/v2/library/<repository>/manifests/<tag>` and
//! `<base>/v2/library/<repository>/blobs/<digest>`. The base path is kept as a
//! prefix, empty and `.` segments are collapsed, `..` removes the segment
//! before it (never the host), and nothing is percent-encoded (the
//! registry expects the digest's `:` literally).

/// URL of the manifest document for `repository:tag`.
pub fn resolve_manifest_url(base: &str, repository: &str, tag: &str) -> String {
    join(base, &["v2", "library", repository, "manifests", tag])
}

/// URL of the blob identified by `digest` inside `repository`.
pub fn resolve_blob_url(base: &str, repository: &str, digest: &str) -> String {
    join(base, &["v2", "library", repository, "blobs", digest])
}

fn join(base: &str, segments: &[&str]) -> String {
    let (scheme, rest) = match base.split_once("://") {
        Some((scheme, rest)) => (Some(scheme), rest),
        None => (None, base),
    };

    let mut base_parts = rest.split('/').filter(|p| !p.is_empty());
    // `..` never climbs above the host.
    let host = if scheme.is_some() { base_parts.next() } else { None };

    let mut path: Vec<&str> = Vec::new();
    for part in base_parts.chain(segments.iter().flat_map(|s| s.split('/'))) {
        match part {
            "" | "." => {}
            ".." => {
                path.pop();
            }
            _ => path.push(part),
        }
    }

    let mut out = String::with_capacity(base.len() + 64);
    if let Some(scheme) = scheme {
        out.push_str(scheme);
        out.push_str("://");
    }
    if let Some(host) = host {
        out.push_str(host);
        if !path.is_empty() {
            out.push('/');
        }
    }
    out.push_str(&path.join("/"));
    out
}
