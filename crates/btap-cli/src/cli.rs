//! CLI argument definitions for the `btap` tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "btap",
    version,
    about = "BTAP standards lookups and embodied-carbon audits",
    long_about = "Resolve energy-code rules through the BTAP standard-variant tree and\n\
                  audit the embodied carbon of building envelopes.\n\n\
                  Every command reads a pinned standards directory; see `btap verify`."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include timestamps in log output.
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,

    /// Standards directory (default: $BTAP_STANDARDS_DIR, then the bundled `standards/`).
    #[arg(long = "standards-dir", value_name = "DIR", global = true)]
    pub standards_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Verify the standards manifest pins and report what was loaded.
    Verify(VerifyArgs),

    /// Inspect the standard-variant registry.
    #[command(subcommand)]
    Standards(StandardsCommand),

    /// Audit the embodied carbon of a building model.
    Carbon(CarbonArgs),
}

#[derive(Args)]
pub struct VerifyArgs {
    /// Print the report as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum StandardsCommand {
    /// List registered standard variants.
    List(ListArgs),

    /// Evaluate one rule for one variant.
    Rule(EvaluateArgs),
}

#[derive(Args)]
pub struct ListArgs {
    /// Only list variants of this family (e.g. "NECB", "DEER").
    #[arg(long = "family", value_name = "ROOT")]
    pub family: Option<String>,
}

#[derive(Args)]
pub struct EvaluateArgs {
    /// Registered variant name, e.g. "90.1-2013_MediumOffice".
    #[arg(value_name = "VARIANT")]
    pub variant: String,

    /// Rule name, e.g. "motor_efficiency".
    #[arg(value_name = "RULE")]
    pub rule: String,

    /// Rule argument as NAME=VALUE; numbers, YYYY-MM-DD dates and true/false are typed.
    #[arg(long = "arg", value_name = "NAME=VALUE")]
    pub args: Vec<String>,
}

#[derive(Args)]
pub struct CarbonArgs {
    /// Building model JSON file.
    #[arg(value_name = "MODEL")]
    pub model: PathBuf,

    /// Life-cycle stages to count.
    #[arg(long = "scope", value_enum, default_value = "a-c")]
    pub scope: ScopeArg,

    /// Print the report as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

/// CLI carbon scope choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum ScopeArg {
    #[value(name = "a-c")]
    AToC,
    #[value(name = "a1-a5")]
    A1ToA5,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_rule_arguments() {
        let cli = Cli::parse_from([
            "btap",
            "--standards-dir",
            "/tmp/standards",
            "standards",
            "rule",
            "90.1-2013",
            "motor_efficiency",
            "--arg",
            "horsepower=10",
            "--arg",
            "type=Enclosed",
        ]);
        assert_eq!(cli.standards_dir, Some(PathBuf::from("/tmp/standards")));
        let Command::Standards(StandardsCommand::Rule(args)) = cli.command else {
            panic!("expected standards rule");
        };
        assert_eq!(args.variant, "90.1-2013");
        assert_eq!(args.args, ["horsepower=10", "type=Enclosed"]);
    }

    #[test]
    fn carbon_scope_defaults_to_a_to_c() {
        let cli = Cli::parse_from(["btap", "carbon", "model.json"]);
        let Command::Carbon(args) = cli.command else {
            panic!("expected carbon");
        };
        assert!(matches!(args.scope, ScopeArg::AToC));
        assert!(!args.json);
        assert!(!cli.log_timestamps);
    }

    #[test]
    fn log_timestamps_is_global() {
        let cli = Cli::parse_from(["btap", "verify", "--log-timestamps"]);
        assert!(cli.log_timestamps);
    }
}
