use {
    anyhow::Result,
    clap::Subcommand,
    drape_config::{DrapeConfig, Severity, default_config_template, validate},
    std::path::Path,
};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print a documented config file with every default filled in.
    Template,
    /// Print the effective configuration with secrets masked.
    Show,
    /// Validate the configuration and report errors/warnings.
    Check,
}

pub fn handle_config(
    action: ConfigAction,
    config: &DrapeConfig,
    path: Option<&Path>,
) -> Result<()> {
    match action {
        ConfigAction::Template => {
            print!("{}", default_config_template());
            Ok(())
        },
        ConfigAction::Show => {
            print!("{}", toml::to_string_pretty(&config.redacted())?);
            Ok(())
        },
        ConfigAction::Check => check(config, path),
    }
}

/// ANSI color codes.
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn check(config: &DrapeConfig, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => eprintln!("Checking {}\n", path.display()),
        None => eprintln!("No config file found; checking defaults.\n"),
    }

    let diagnostics = validate(config);
    for d in &diagnostics {
        let color = match d.severity {
            Severity::Error => RED,
            Severity::Warning => YELLOW,
        };
        eprintln!("  {BOLD}{color}{}{RESET} {}: {}", d.severity, d.path, d.message);
    }

    let errors = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let warnings = diagnostics.len() - errors;

    if diagnostics.is_empty() {
        eprintln!("No issues found.");
    } else {
        eprintln!("\n{errors} error(s), {warnings} warning(s)");
    }

    if errors > 0 {
        anyhow::bail!("configuration has {errors} error(s)");
    }
    Ok(())
}
