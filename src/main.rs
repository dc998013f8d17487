//! hexagen's application entry point.
//! Resolves the configuration, generates the project tree and runs the
//! dependency install, or hands control to a plugin.

use log::{info, warn};

use hexagen::{
    cli::{get_args, Args, Plugin},
    config::{get_answers_from, resolve_config},
    error::{default_error_handler, Result},
    external::{delegate_to_plugin, install_command},
    logger::init_logger,
    manifest::{DirectoryManifest, TemplateManifest},
    materializer::materialize,
    prompt::{DialoguerPrompter, Prompter},
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Some(Plugin::External(argv)) = &args.plugin {
        match delegate_to_plugin(argv) {
            Ok(code) => std::process::exit(code),
            Err(err) => default_error_handler(err),
        }
        return;
    }

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Merges flags, stdin answers and interactive prompts
/// 2. Materializes the project tree
/// 3. Reports best-effort failures as warnings
/// 4. Runs `go mod tidy` unless skipped; failure only warns
fn run(args: Args) -> Result<()> {
    let prompter = DialoguerPrompter::new();
    let answers = get_answers_from(args.stdin)?;
    let config = resolve_config(
        args.flags(),
        answers,
        args.interactive.then_some(&prompter as &dyn Prompter),
    )?;

    let report = materialize(
        &config,
        &DirectoryManifest::standard(),
        &TemplateManifest::standard(),
    )?;

    for skipped in &report.skipped {
        warn!("{skipped}");
    }
    for file in &report.files {
        println!("Created: '{}'", file.display());
    }
    println!("Project structure created successfully in {}.", report.root.display());

    if args.skip_install {
        info!("Skipping dependency installation.");
    } else {
        let install = install_command(&report.root);
        println!("Installing dependencies ({})...", install.display());
        match install.run_checked() {
            Ok(()) => println!("Dependencies installed successfully."),
            Err(err) => {
                warn!("Failed to install dependencies: {err}");
                println!("You can manually run: {}", install.display());
            }
        }
    }

    println!("\nNext steps:\n  cd {}\n  make run", config.root.display());
    Ok(())
}
