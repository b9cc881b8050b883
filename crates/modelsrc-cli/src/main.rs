mod commands;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use commands::{EXIT_FAILURE, EXIT_RECIPE_ERROR, EXIT_REFERENCE_ERROR, EXIT_REGISTRY_ERROR};
use modelsrc_recipe::{DEFAULT_RECIPE, SOURCE_KEY};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "modelsrc",
    version,
    about = "Resolve registry model manifests into build-recipe source arrays"
)]
struct Cli {
    /// Registry base URL (overrides config file).
    #[arg(long, global = true)]
    registry: Option<String>,

    /// Overall request deadline in seconds (overrides config file).
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the download URLs for a model, one per line.
    Fetch {
        /// Model reference, `repository[:tag]` (tag defaults to "latest").
        model: String,
    },
    /// Rewrite the source array of a build recipe with the model's URLs.
    Update {
        /// Model reference, `repository[:tag]` (tag defaults to "latest").
        model: String,
        /// Recipe file to rewrite in place.
        #[arg(long, default_value = DEFAULT_RECIPE)]
        recipe: PathBuf,
        /// Name of the array to rewrite.
        #[arg(long, default_value = SOURCE_KEY)]
        key: String,
        /// Exit non-zero if the recipe is out of date, without writing it.
        #[arg(long, default_value_t = false)]
        check: bool,
    },
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
    /// Generate man pages in the specified directory.
    ManPages {
        /// Output directory for man pages.
        #[arg(default_value = "man")]
        dir: PathBuf,
    },
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    // stdout is reserved for command output.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("MODELSRC_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let json_output = cli.json;

    let result = match cli.command {
        Commands::Fetch { model } => {
            commands::registry_config(cli.registry.as_deref(), cli.timeout)
                .and_then(|config| commands::fetch::run(config, &model, json_output))
        }
        Commands::Update {
            model,
            recipe,
            key,
            check,
        } => commands::registry_config(cli.registry.as_deref(), cli.timeout).and_then(|config| {
            commands::update::run(
                config,
                &model,
                &commands::update::RecipeTarget {
                    path: &recipe,
                    key: &key,
                    check,
                },
                json_output,
            )
        }),
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
        Commands::ManPages { dir } => commands::man_pages::run::<Cli>(&dir),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            let code = if msg.starts_with("invalid model reference:") {
                EXIT_REFERENCE_ERROR
            } else if msg.starts_with("registry error:") {
                EXIT_REGISTRY_ERROR
            } else if msg.starts_with("recipe error:") {
                EXIT_RECIPE_ERROR
            } else {
                EXIT_FAILURE
            };
            ExitCode::from(code)
        }
    }
}
