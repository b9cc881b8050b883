use super::{
    json_pretty, parse_reference, spin_fail, spin_ok, spinner, EXIT_FAILURE, EXIT_SUCCESS,
};
use console::Style;
use modelsrc_recipe::{check_file, patch_file, PatchOutcome};
use modelsrc_remote::{resolve_sources, HttpRegistry, RegistryConfig};
use std::path::Path;

/// Which recipe to rewrite, and how.
pub struct RecipeTarget<'a> {
    pub path: &'a Path,
    pub key: &'a str,
    pub check: bool,
}

pub fn run(
    config: RegistryConfig,
    model: &str,
    target: &RecipeTarget<'_>,
    json: bool,
) -> Result<u8, String> {
    let reference = parse_reference(model)?;
    let registry = HttpRegistry::new(config);

    let pb = spinner(&format!("resolving {reference}…"));
    let entries = resolve_sources(&registry, &reference).map_err(|e| {
        spin_fail(&pb, "resolve failed");
        format!("registry error: {e}")
    })?;
    spin_ok(&pb, &format!("resolved {} sources", entries.len()));

    let outcome = if target.check {
        check_file(target.path, target.key, &entries)
    } else {
        patch_file(target.path, target.key, &entries)
    }
    .map_err(|e| format!("recipe error: {e}"))?;

    let status = RecipeStatus::new(outcome, target.check);

    if json {
        let payload = serde_json::json!({
            "status": status.as_str(),
            "recipe": target.path,
            "key": target.key,
            "model": reference.to_string(),
            "entries": entries,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        let recipe = target.path.display();
        match status {
            RecipeStatus::Updated => println!(
                "{} '{}' array in {recipe}",
                Style::new().green().apply_to("updated"),
                target.key
            ),
            RecipeStatus::Outdated => println!(
                "{} '{}' array in {recipe} is out of date (run 'modelsrc update {reference}')",
                Style::new().yellow().apply_to("drift:"),
                target.key
            ),
            RecipeStatus::Unchanged => println!(
                "{recipe} {}",
                Style::new().dim().apply_to("already up to date")
            ),
        }
    }

    Ok(status.exit_code())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecipeStatus {
    Updated,
    Unchanged,
    /// `--check` found drift; nothing was written.
    Outdated,
}

impl RecipeStatus {
    fn new(outcome: PatchOutcome, check: bool) -> Self {
        match (outcome, check) {
            (PatchOutcome::Unchanged, _) => Self::Unchanged,
            (PatchOutcome::Updated, false) => Self::Updated,
            (PatchOutcome::Updated, true) => Self::Outdated,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Updated => "updated",
            Self::Unchanged => "unchanged",
            Self::Outdated => "outdated",
        }
    }

    fn exit_code(self) -> u8 {
        match self {
            Self::Outdated => EXIT_FAILURE,
            Self::Updated | Self::Unchanged => EXIT_SUCCESS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_mode_drift_is_outdated_and_fails() {
        let status = RecipeStatus::new(PatchOutcome::Updated, true);
        assert_eq!(status, RecipeStatus::Outdated);
        assert_eq!(status.as_str(), "outdated");
        assert_eq!(status.exit_code(), EXIT_FAILURE);
    }

    #[test]
    fn write_mode_update_succeeds() {
        let status = RecipeStatus::new(PatchOutcome::Updated, false);
        assert_eq!(status, RecipeStatus::Updated);
        assert_eq!(status.as_str(), "updated");
        assert_eq!(status.exit_code(), EXIT_SUCCESS);
    }

    #[test]
    fn unchanged_succeeds_in_both_modes() {
        for check in [false, true] {
            let status = RecipeStatus::new(PatchOutcome::Unchanged, check);
            assert_eq!(status.as_str(), "unchanged");
            assert_eq!(status.exit_code(), EXIT_SUCCESS);
        }
    }
}
