//! BTAP command-line tool.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use btap_carbon::CarbonScope;
use btap_cli::commands::{resolve_standards_dir, run_carbon, run_list, run_rule, run_verify};
use btap_cli::logging::{LogConfig, LogFormat, init_logging};

mod cli;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg, ScopeArg, StandardsCommand};
use crate::summary::{print_carbon_report, print_doctor_report, print_rule_value, print_variants};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let standards_dir = resolve_standards_dir(cli.standards_dir.as_deref());
    let result = match cli.command {
        Command::Verify(args) => run_verify(&standards_dir).and_then(|report| {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_doctor_report(&report);
            }
            Ok(())
        }),
        Command::Standards(StandardsCommand::List(args)) => {
            run_list(args.family.as_deref()).map(|listings| print_variants(&listings))
        }
        Command::Standards(StandardsCommand::Rule(args)) => {
            run_rule(&standards_dir, &args.variant, &args.rule, &args.args)
                .map(|value| print_rule_value(&value))
        }
        Command::Carbon(args) => {
            let scope = match args.scope {
                ScopeArg::AToC => CarbonScope::AToC,
                ScopeArg::A1ToA5 => CarbonScope::A1ToA5,
            };
            run_carbon(&standards_dir, &args.model, scope).and_then(|report| {
                if args.json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    print_carbon_report(&report, scope);
                }
                Ok(())
            })
        }
    };
    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_timestamps = cli.log_timestamps;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
