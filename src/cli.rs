// src/cli.rs
use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{env, path::PathBuf};

use crate::core::config::{DEFAULT_JOB_CONFIG, GLOBAL_CONFIG_ENV};
use crate::infra::{logging, t};

pub mod commands;

use commands::configure::GlobalOverrides;
use commands::run::RunArgs;

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for a `--lang <VALUE>` argument.
fn pre_parse_language() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    let pos = args.iter().position(|arg| arg == "--lang")?;
    args.get(pos + 1).cloned()
}

fn global_config_arg(locale: &str) -> Arg {
    Arg::new("global-config")
        .short('g')
        .long("global-config")
        .help(t!("arg_global_config", locale = locale).to_string())
        .value_name("GLOBAL_CONFIG")
        .value_parser(clap::value_parser!(PathBuf))
        .action(ArgAction::Set)
}

fn path_arg(id: &'static str, value_name: &'static str, help: String) -> Arg {
    Arg::new(id)
        .long(id)
        .help(help)
        .value_name(value_name)
        .value_parser(clap::value_parser!(PathBuf))
        .action(ArgAction::Set)
}

fn text_arg(id: &'static str, value_name: &'static str, help: String) -> Arg {
    Arg::new(id)
        .long(id)
        .help(help)
        .value_name(value_name)
        .action(ArgAction::Set)
}

fn build_cli(locale: &str) -> Command {
    Command::new("itest-runner")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli_about", locale = locale).to_string())
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli_lang", locale = locale).to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help(t!("cli_verbose", locale = locale).to_string())
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("run")
                .about(t!("cmd_run_about", locale = locale).to_string())
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help(t!("arg_config", locale = locale).to_string())
                        .value_name("CONFIG")
                        .default_value(DEFAULT_JOB_CONFIG)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(global_config_arg(locale))
                .arg(path_arg("workspace-root", "DIR", t!("arg_workspace_root", locale = locale).to_string()))
                .arg(text_arg("run-id", "RUN_ID", t!("arg_run_id", locale = locale).to_string()))
                .arg(path_arg("log-file", "FILE", t!("arg_log_file", locale = locale).to_string()))
                .arg(path_arg("archive-dir", "DIR", t!("arg_archive_dir", locale = locale).to_string()))
                .arg(path_arg("summary-json", "FILE", t!("arg_summary_json", locale = locale).to_string())),
        )
        .subcommand(
            Command::new("init")
                .about(t!("cmd_init_about", locale = locale).to_string())
                .arg(
                    Arg::new("non-interactive")
                        .long("non-interactive")
                        .help(t!("arg_non_interactive", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("force")
                        .long("force")
                        .help(t!("arg_force", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("configure")
                .about(t!("cmd_configure_about", locale = locale).to_string())
                .arg(global_config_arg(locale))
                .args(GlobalOverrides::FIELDS.iter().map(|&(id, value_name)| {
                    text_arg(id, value_name, t!("arg_global_field", locale = locale, field = id).to_string())
                })),
        )
        .subcommand(
            Command::new("check")
                .about(t!("cmd_check_about", locale = locale).to_string())
                .arg(global_config_arg(locale))
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help(t!("arg_config", locale = locale).to_string())
                        .value_name("CONFIG")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                ),
        )
}

/// Global configuration path: `--global-config`, then `ITEST_GLOBAL_CONFIG`,
/// then `ITestGlobal.toml` in the current directory.
fn global_config_path(matches: &ArgMatches) -> PathBuf {
    matches
        .get_one::<PathBuf>("global-config")
        .cloned()
        .or_else(|| env::var_os(GLOBAL_CONFIG_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(crate::core::config::DEFAULT_GLOBAL_CONFIG))
}

/// Parses the command line and runs the selected command.
///
/// # Returns
/// `Ok(true)` when the command succeeded, `Ok(false)` when it ran but reported
/// a failure, and an error when it could not run at all.
pub async fn run() -> Result<bool> {
    // Pre-parse language and initialize i18n first.
    let requested = pre_parse_language();
    let language = match &requested {
        Some(language) => {
            let selected = crate::select_locale(language);
            rust_i18n::set_locale(&selected);
            selected
        }
        None => crate::init(),
    };

    let matches = build_cli(&language).get_matches();
    let verbose = matches.get_flag("verbose");
    logging::init_logging(if verbose { "debug" } else { "info" });

    match matches.subcommand() {
        Some(("run", run_matches)) => {
            let args = RunArgs {
                config: run_matches
                    .get_one::<PathBuf>("config")
                    .cloned()
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_JOB_CONFIG)),
                global_config: global_config_path(run_matches),
                workspace_root: run_matches.get_one::<PathBuf>("workspace-root").cloned(),
                run_id: run_matches.get_one::<String>("run-id").cloned(),
                log_file: run_matches.get_one::<PathBuf>("log-file").cloned(),
                archive_dir: run_matches.get_one::<PathBuf>("archive-dir").cloned(),
                summary_json: run_matches.get_one::<PathBuf>("summary-json").cloned(),
                language: requested,
            };
            commands::run::execute(args).await
        }
        Some(("init", init_matches)) => {
            let non_interactive = init_matches.get_flag("non-interactive");
            let force = init_matches.get_flag("force");
            commands::init::run_init_wizard(&language, non_interactive, force)?;
            Ok(true)
        }
        Some(("configure", configure_matches)) => {
            let overrides = GlobalOverrides::from_matches(configure_matches);
            commands::configure::execute(&global_config_path(configure_matches), &overrides, &language)?;
            Ok(true)
        }
        Some(("check", check_matches)) => {
            let job_config = check_matches.get_one::<PathBuf>("config").cloned();
            commands::check::execute(&global_config_path(check_matches), job_config.as_deref(), &language).await
        }
        _ => {
            // No subcommand: print help like clap does for unknown input.
            build_cli(&language).print_help()?;
            println!();
            Ok(true)
        }
    }
}
