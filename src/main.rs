//! search-engines: command-line front end for the engine registry
//!
//! Loads the catalog from settings, opens the profile's preference store and
//! applies one command to the registry.

use anyhow::{bail, Context, Result};
use search_engines::{
    config::Settings,
    engines::{EngineRegistry, SettingsCatalog},
    prefs::{FileStore, MemoryStore, PreferenceStore},
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let options = parse_args(std::env::args().skip(1))?;

    match options.command {
        Command::Help => {
            print_usage();
            return Ok(());
        }
        Command::Version => {
            println!("search-engines {}", search_engines::VERSION);
            return Ok(());
        }
        _ => {}
    }

    let (settings, settings_path) = load_settings(options.config.as_ref())?;

    let default_filter = if settings.general.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match settings_path {
        Some(path) => info!("Loaded settings from: {}", path.display()),
        None => info!("No settings file found, using defaults"),
    }

    let catalog = SettingsCatalog::load(&settings);

    let store: Arc<dyn PreferenceStore> = if options.ephemeral {
        debug!("Using in-memory preference store");
        Arc::new(MemoryStore::new())
    } else {
        let path = settings.preferences_path();
        info!("Using preferences at: {}", path.display());
        Arc::new(
            FileStore::open(&path)
                .with_context(|| format!("failed to open preferences at {}", path.display()))?,
        )
    };

    let mut registry = EngineRegistry::new(&catalog, store)?;
    run(&mut registry, options.command)
}

/// Parsed command line
#[derive(Debug, PartialEq)]
struct Options {
    config: Option<PathBuf>,
    ephemeral: bool,
    command: Command,
}

#[derive(Debug, PartialEq)]
enum Command {
    List,
    Default(Option<String>),
    Order(Vec<String>),
    Enable(String),
    Disable(String),
    Quick,
    Suggestions(Option<bool>),
    OptIn(Option<bool>),
    Help,
    Version,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Options> {
    let mut config = None;
    let mut ephemeral = false;
    let mut rest = Vec::new();
    let mut info_command = None;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" | "--config" => {
                let path = args.next().context("--config requires a file path")?;
                config = Some(PathBuf::from(path));
            }
            "--ephemeral" => ephemeral = true,
            "-h" | "--help" => info_command = Some(Command::Help),
            "-V" | "--version" => info_command = info_command.or(Some(Command::Version)),
            _ => rest.push(arg),
        }
    }

    if let Some(command) = info_command {
        return Ok(Options {
            config,
            ephemeral,
            command,
        });
    }

    let mut rest = rest.into_iter();
    let command = match rest.next().as_deref() {
        None | Some("list") => Command::List,
        Some("help") => Command::Help,
        Some("version") => Command::Version,
        Some("default") => Command::Default(rest.next()),
        Some("order") => {
            let names: Vec<String> = rest.by_ref().collect();
            if names.is_empty() {
                bail!("order requires at least one engine name");
            }
            Command::Order(names)
        }
        Some("enable") => Command::Enable(rest.next().context("enable requires an engine name")?),
        Some("disable") => {
            Command::Disable(rest.next().context("disable requires an engine name")?)
        }
        Some("quick") => Command::Quick,
        Some("suggestions") => Command::Suggestions(match rest.next().as_deref() {
            None => None,
            Some("on") => Some(true),
            Some("off") => Some(false),
            Some(other) => bail!("expected 'on' or 'off', got '{}'", other),
        }),
        Some("opt-in") => Command::OptIn(match rest.next().as_deref() {
            None => None,
            Some("shown") => Some(false),
            Some("reset") => Some(true),
            Some(other) => bail!("expected 'shown' or 'reset', got '{}'", other),
        }),
        Some(other) => bail!("unknown command '{}' (try --help)", other),
    };

    if let Some(extra) = rest.next() {
        bail!("unexpected argument '{}'", extra);
    }

    Ok(Options {
        config,
        ephemeral,
        command,
    })
}

fn run(registry: &mut EngineRegistry, command: Command) -> Result<()> {
    match command {
        Command::List => print_engines(registry),
        Command::Default(None) => println!("{}", registry.default_engine().short_name),
        Command::Default(Some(name)) => {
            registry.set_default_engine(&name)?;
            print_engines(registry);
        }
        Command::Order(names) => {
            registry.set_ordered_engines(&names)?;
            print_engines(registry);
        }
        Command::Enable(name) => registry.enable_engine(&name)?,
        Command::Disable(name) => registry.disable_engine(&name)?,
        Command::Quick => {
            for engine in registry.quick_search_engines() {
                println!("{}", engine.short_name);
            }
        }
        Command::Suggestions(None) => println!(
            "{}",
            if registry.should_show_search_suggestions() { "on" } else { "off" }
        ),
        Command::Suggestions(Some(enabled)) => {
            registry.set_should_show_search_suggestions(enabled)?
        }
        Command::OptIn(None) => println!(
            "{}",
            if registry.should_show_search_suggestions_opt_in() {
                "pending"
            } else {
                "shown"
            }
        ),
        Command::OptIn(Some(show)) => registry.set_should_show_search_suggestions_opt_in(show)?,
        Command::Help | Command::Version => {}
    }
    Ok(())
}

fn print_engines(registry: &EngineRegistry) {
    for engine in registry.ordered_engines() {
        let name = engine.short_name.as_str();
        let marker = if registry.is_engine_default(name) {
            "*"
        } else if registry.is_engine_enabled(name) {
            "+"
        } else {
            "-"
        };
        println!("{} {:<16} {}", marker, name, engine.search_template);
    }
    if registry.should_disable_old_default() {
        if let Some(old) = registry.migration_old_default_name() {
            println!("(previous default {} is disabled)", old);
        }
    }
}

/// Load settings from file or use defaults
fn load_settings(explicit: Option<&PathBuf>) -> Result<(Settings, Option<PathBuf>)> {
    let mut candidates = Vec::new();
    if let Some(path) = explicit {
        if !path.exists() {
            bail!("settings file not found: {}", path.display());
        }
        candidates.push(path.clone());
    }
    if let Ok(path) = std::env::var("SEARCH_ENGINES_SETTINGS_PATH") {
        candidates.push(PathBuf::from(path));
    }
    candidates.push(PathBuf::from("settings.yml"));
    candidates.push(PathBuf::from("config/settings.yml"));
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("search-engines/settings.yml"));
    }

    for path in candidates {
        if path.exists() {
            let mut settings = Settings::from_file(&path)
                .with_context(|| format!("failed to load settings from {}", path.display()))?;
            settings.merge_env();
            return Ok((settings, Some(path)));
        }
    }

    let mut settings = Settings::default();
    settings.merge_env();
    Ok((settings, None))
}

/// Print usage information
fn print_usage() {
    println!(
        r#"
search-engines v{}
Manage the search engine order, default and quick search set for a profile

USAGE:
    search-engines [OPTIONS] [COMMAND]

COMMANDS:
    list                   Show engines in order (* default, + enabled, - disabled)
    default [NAME]         Show or set the default engine
    order NAME...          Set the engine order; omitted engines follow alphabetically
    enable NAME            Offer an engine for quick search
    disable NAME           Stop offering an engine for quick search
    quick                  List quick search engines
    suggestions [on|off]   Show or set whether search suggestions are enabled
    opt-in [shown|reset]   Show or set the suggestions opt-in prompt state

OPTIONS:
    -c, --config <FILE>    Path to configuration file
        --ephemeral        Keep preferences in memory only
    -h, --help             Print help information
    -V, --version          Print version information

ENVIRONMENT VARIABLES:
    SEARCH_ENGINES_SETTINGS_PATH   Path to settings.yml
    SEARCH_ENGINES_DEBUG           Enable debug logging (true/false)
    SEARCH_ENGINES_DEFAULT_ENGINE  Region default engine
    SEARCH_ENGINES_PREFS_PATH      Preferences file
"#,
        search_engines::VERSION
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_parse_defaults_to_list() {
        let options = parse_args(args("")).unwrap();
        assert_eq!(options.command, Command::List);
        assert!(!options.ephemeral);
        assert!(options.config.is_none());
    }

    #[test]
    fn test_parse_options_and_command() {
        let options = parse_args(args("--ephemeral -c custom.yml order Bing Google")).unwrap();
        assert!(options.ephemeral);
        assert_eq!(options.config, Some(PathBuf::from("custom.yml")));
        assert_eq!(
            options.command,
            Command::Order(vec!["Bing".to_string(), "Google".to_string()])
        );
    }

    #[test]
    fn test_parse_toggles() {
        assert_eq!(
            parse_args(args("suggestions on")).unwrap().command,
            Command::Suggestions(Some(true))
        );
        assert_eq!(
            parse_args(args("opt-in shown")).unwrap().command,
            Command::OptIn(Some(false))
        );
        assert!(parse_args(args("suggestions maybe")).is_err());
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(args("enable")).is_err());
        assert!(parse_args(args("order")).is_err());
        assert!(parse_args(args("frobnicate")).is_err());
        assert!(parse_args(args("default Bing Google")).is_err());
        assert!(parse_args(args("--config")).is_err());
    }

    #[test]
    fn test_help_flag_wins() {
        assert_eq!(parse_args(args("default -h")).unwrap().command, Command::Help);
        assert_eq!(parse_args(args("-V")).unwrap().command, Command::Version);
    }

    #[test]
    fn test_run_against_memory_store() {
        let catalog = SettingsCatalog::load(&Settings::default());
        let mut registry = EngineRegistry::new(&catalog, Arc::new(MemoryStore::new())).unwrap();

        run(&mut registry, Command::Default(Some("Google".to_string()))).unwrap();
        run(&mut registry, Command::Disable("Twitter".to_string())).unwrap();
        assert_eq!(registry.default_engine().short_name, "Google");
        assert!(!registry.is_engine_enabled("Twitter"));
        assert!(run(&mut registry, Command::Enable("AltaVista".to_string())).is_err());
    }
}
