use crate::patch::patch_source_bytes;
use crate::RecipeError;
use modelsrc_schema::SourceEntry;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Recipe file looked up in the working directory when none is given.
pub const DEFAULT_RECIPE: &str = "PKGBUILD";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    Updated,
    Unchanged,
}

/// Rewrite the `key` array of the recipe at `path` in place.
///
/// The new content is computed in full before anything is written. When it
/// equals the current content the file is left alone. A symlinked recipe is
/// written through: the link stays and its target is rewritten.
pub fn patch_file(
    path: &Path,
    key: &str,
    entries: &[SourceEntry],
) -> Result<PatchOutcome, RecipeError> {
    let (current, patched) = read_and_patch(path, key, entries)?;
    if current == patched {
        tracing::debug!("{}: '{key}' array already current", path.display());
        return Ok(PatchOutcome::Unchanged);
    }
    write_atomic(path, &patched)?;
    tracing::info!(
        "rewrote '{key}' array in {} ({} entries)",
        path.display(),
        entries.len()
    );
    Ok(PatchOutcome::Updated)
}

/// Report what [`patch_file`] would do without touching the file.
pub fn check_file(
    path: &Path,
    key: &str,
    entries: &[SourceEntry],
) -> Result<PatchOutcome, RecipeError> {
    let (current, patched) = read_and_patch(path, key, entries)?;
    Ok(if current == patched {
        PatchOutcome::Unchanged
    } else {
        PatchOutcome::Updated
    })
}

fn read_and_patch(
    path: &Path,
    key: &str,
    entries: &[SourceEntry],
) -> Result<(Vec<u8>, Vec<u8>), RecipeError> {
    let current = std::fs::read(path).map_err(|source| RecipeError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let patched = patch_source_bytes(&current, key, entries)?;
    Ok((current, patched))
}

// Temp file in the target's directory, renamed over it; original mode kept.
// Symlinks are resolved first so the link itself is never replaced.
fn write_atomic(path: &Path, content: &[u8]) -> Result<(), RecipeError> {
    let write_err = |source: std::io::Error| RecipeError::Write {
        path: path.to_path_buf(),
        source,
    };
    let dest = std::fs::canonicalize(path).map_err(write_err)?;
    let dir = dest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

    let permissions = std::fs::metadata(&dest).map_err(write_err)?.permissions();
    let mut tmp = NamedTempFile::new_in(&dir).map_err(write_err)?;
    tmp.write_all(content).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.as_file().set_permissions(permissions).map_err(write_err)?;
    tmp.persist(&dest).map_err(|e| write_err(e.error))?;
    Ok(())
}
