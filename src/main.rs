#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::doc_markdown,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::needless_pass_by_value,
    clippy::too_many_lines,
    clippy::uninlined_format_args
)]

use action_eventlog::actions::{
    create_action_event_log_record_object, validated_related_saved_objects,
    CreateActionEventLogRecordParams,
};
use action_eventlog::config::Config;
use action_eventlog::event_log::{create_event_logger, Event};
use action_eventlog::ConfigCommands;
use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CompletionShell {
    #[value(name = "bash")]
    Bash,
    #[value(name = "fish")]
    Fish,
    #[value(name = "zsh")]
    Zsh,
    #[value(name = "powershell")]
    PowerShell,
    #[value(name = "elvish")]
    Elvish,
}

/// Build event-log records for connector action executions.
#[derive(Parser, Debug)]
#[command(name = "action-eventlog")]
#[command(version)]
#[command(about = "Build event-log records for connector action executions.", long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to ~/.action-eventlog/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build an event-log record from action execution parameters
    #[command(long_about = "\
Build an event-log record from action execution parameters.

Reads a JSON object of camelCase parameters (actionId, actionTypeId, \
actionExecutionId, action, savedObjects, relatedSavedObjects, source, ...) \
and hands the resulting record to the configured event log sink.

Examples:
  action-eventlog build --params params.json
  cat params.json | action-eventlog build --pretty
  action-eventlog build -p params.json --sink log")]
    Build {
        /// Parameters file; reads stdin when omitted or '-'
        #[arg(short, long)]
        params: Option<PathBuf>,

        /// Pretty-print the record (overrides event_log.pretty)
        #[arg(long)]
        pretty: bool,

        /// Event log sink: stdout, stderr, log (overrides event_log.sink)
        #[arg(long)]
        sink: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        config_command: ConfigCommands,
    },

    /// Generate shell completion script to stdout
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Completions must remain stdout-only and should not load config or initialize logging.
    if let Commands::Completions { shell } = &cli.command {
        let mut stdout = std::io::stdout().lock();
        write_shell_completion(*shell, &mut stdout)?;
        return Ok(());
    }

    let bootstrap_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let mut config = load_config(cli.config.as_deref(), std::io::stderr, bootstrap_filter)?;

    // Diagnostics go to stderr so records on stdout stay machine-readable.
    let subscriber = fmt::Subscriber::builder()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter.as_str())),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")?;

    match cli.command {
        Commands::Completions { .. } => unreachable!(),

        Commands::Build {
            params,
            pretty,
            sink,
        } => {
            if pretty {
                config.event_log.pretty = true;
            }
            if let Some(sink) = sink {
                config.event_log.sink = sink;
            }
            config.validate()?;

            let raw = read_params(params.as_deref())?;
            let event = build_event(&raw)?;
            let logger = create_event_logger(&config.event_log)?;
            logger.log_event(event)
        }

        Commands::Config { config_command } => match config_command {
            ConfigCommands::Show => {
                let rendered =
                    toml::to_string_pretty(&config).context("Failed to render config")?;
                println!("# {}", config.config_path.display());
                print!("{rendered}");
                Ok(())
            }
            ConfigCommands::Init { force } => {
                if config.config_path.exists() && !force {
                    bail!(
                        "{} already exists; pass --force to overwrite",
                        config.config_path.display()
                    );
                }
                let fresh = Config {
                    config_path: config.config_path.clone(),
                    ..Config::default()
                };
                fresh.save()?;
                println!("Wrote {}", fresh.config_path.display());
                Ok(())
            }
            ConfigCommands::Schema => {
                let schema = schemars::schema_for!(Config);
                let rendered =
                    serde_json::to_string_pretty(&schema).context("Failed to render JSON Schema")?;
                println!("{rendered}");
                Ok(())
            }
        },
    }
}

/// Load config under a temporary subscriber so warnings raised while loading
/// (bad env overrides, defaults used) reach stderr before the configured
/// filter is known.
fn load_config<W>(path: Option<&Path>, make_writer: W, filter: EnvFilter) -> Result<Config>
where
    W: for<'a> fmt::MakeWriter<'a> + Send + Sync + 'static,
{
    let bootstrap = fmt::Subscriber::builder()
        .with_writer(make_writer)
        .with_ansi(false)
        .with_env_filter(filter)
        .finish();
    tracing::subscriber::with_default(bootstrap, || Config::load(path))
}

fn read_params(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read parameters file {}", path.display())),
        _ => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("Failed to read parameters from stdin")?;
            Ok(raw)
        }
    }
}

/// Parse raw parameter JSON and build the record.
///
/// `relatedSavedObjects` comes from untrusted payloads and goes through
/// validation; an invalid list is dropped rather than failing the build.
fn build_event(raw: &str) -> Result<Event> {
    let mut value: serde_json::Value =
        serde_json::from_str(raw).context("Parameters are not valid JSON")?;
    let Some(object) = value.as_object_mut() else {
        bail!("Parameters must be a JSON object");
    };
    let related = object.remove("relatedSavedObjects");

    let mut params: CreateActionEventLogRecordParams =
        serde_json::from_value(value).context("Invalid action execution parameters")?;
    if let Some(related) = related {
        params.related_saved_objects = Some(validated_related_saved_objects(&related));
    }

    Ok(create_action_event_log_record_object(&params))
}

fn write_shell_completion<W: Write>(shell: CompletionShell, writer: &mut W) -> Result<()> {
    use clap_complete::generate;
    use clap_complete::shells;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    match shell {
        CompletionShell::Bash => generate(shells::Bash, &mut cmd, bin_name.clone(), writer),
        CompletionShell::Fish => generate(shells::Fish, &mut cmd, bin_name.clone(), writer),
        CompletionShell::Zsh => generate(shells::Zsh, &mut cmd, bin_name.clone(), writer),
        CompletionShell::PowerShell => {
            generate(shells::PowerShell, &mut cmd, bin_name.clone(), writer);
        }
        CompletionShell::Elvish => generate(shells::Elvish, &mut cmd, bin_name, writer),
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn config_load_warnings_are_emitted() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        let previous = std::env::var("ACTION_EVENTLOG_PRETTY").ok();
        std::env::set_var("ACTION_EVENTLOG_PRETTY", "bogus");

        let captured = CapturedLog::default();
        let writer = captured.clone();
        let result = load_config(Some(&path), move || writer.clone(), EnvFilter::new("warn"));

        match previous {
            Some(value) => std::env::set_var("ACTION_EVENTLOG_PRETTY", value),
            None => std::env::remove_var("ACTION_EVENTLOG_PRETTY"),
        }

        let config = result.unwrap();
        assert!(!config.event_log.pretty);
        let output = String::from_utf8(captured.0.lock().clone()).unwrap();
        assert!(
            output.contains("Ignoring invalid ACTION_EVENTLOG_PRETTY value: bogus"),
            "missing warning in: {output}"
        );
    }

    #[test]
    fn cli_definition_has_no_flag_conflicts() {
        Cli::command().debug_assert();
    }

    #[test]
    fn build_cli_parses_overrides() {
        let cli = Cli::try_parse_from([
            "action-eventlog",
            "build",
            "--params",
            "p.json",
            "--pretty",
            "--sink",
            "log",
        ])
        .expect("build invocation should parse");
        match cli.command {
            Commands::Build {
                params,
                pretty,
                sink,
            } => {
                assert_eq!(params.as_deref(), Some(Path::new("p.json")));
                assert!(pretty);
                assert_eq!(sink.as_deref(), Some("log"));
            }
            other => panic!("expected build command, got {other:?}"),
        }
    }

    #[test]
    fn completions_cli_parses_supported_shells() {
        for shell in ["bash", "fish", "zsh", "powershell", "elvish"] {
            let cli = Cli::try_parse_from(["action-eventlog", "completions", shell])
                .expect("completions invocation should parse");
            match cli.command {
                Commands::Completions { .. } => {}
                other => panic!("expected completions command, got {other:?}"),
            }
        }
    }

    #[test]
    fn completion_generation_mentions_binary_name() {
        let mut output = Vec::new();
        write_shell_completion(CompletionShell::Bash, &mut output)
            .expect("completion generation should succeed");
        let script = String::from_utf8(output).expect("completion output should be valid utf-8");
        assert!(
            script.contains("action-eventlog"),
            "completion script should reference binary name"
        );
    }

    #[test]
    fn build_event_validates_related_saved_objects() {
        let raw = r#"{
            "actionId": "1",
            "actionTypeId": ".email",
            "actionExecutionId": "exec",
            "action": "execute",
            "relatedSavedObjects": [{ "id": "", "type": "alert", "typeId": "rt" }]
        }"#;
        let event = build_event(raw).unwrap();
        assert!(event.kibana.saved_objects.is_empty());
        assert!(event.kibana.alert.is_none());
    }

    #[test]
    fn build_event_keeps_valid_related_saved_objects() {
        let raw = r#"{
            "actionId": "1",
            "actionTypeId": ".email",
            "actionExecutionId": "exec",
            "action": "execute",
            "relatedSavedObjects": [{ "id": "r1", "type": "alert", "typeId": "rt" }]
        }"#;
        let event = build_event(raw).unwrap();
        assert_eq!(event.kibana.saved_objects.len(), 1);
        assert_eq!(
            event.kibana.alert.unwrap().rule.rule_type_id.as_deref(),
            Some("rt")
        );
    }

    #[test]
    fn build_event_rejects_non_object_and_missing_ids() {
        assert!(build_event("[]").is_err());
        assert!(build_event("not json").is_err());
        let err = build_event(r#"{ "action": "execute" }"#).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid action execution parameters"));
    }
}
