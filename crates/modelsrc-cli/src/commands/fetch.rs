use super::{json_pretty, parse_reference, spin_fail, spinner, EXIT_SUCCESS};
use modelsrc_remote::{resolve_sources, HttpRegistry, RegistryConfig};

pub fn run(config: RegistryConfig, model: &str, json: bool) -> Result<u8, String> {
    let reference = parse_reference(model)?;
    let registry = HttpRegistry::new(config);

    let pb = spinner(&format!("resolving {reference}…"));
    let entries = resolve_sources(&registry, &reference).map_err(|e| {
        spin_fail(&pb, "resolve failed");
        format!("registry error: {e}")
    })?;
    pb.finish_and_clear();

    if json {
        println!("{}", json_pretty(&entries)?);
    } else {
        for entry in &entries {
            println!("{}", entry.source_line());
        }
    }
    Ok(EXIT_SUCCESS)
}
