use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use include_trim::commands::{check_command, scan_command, trim_command, ConfigOverrides};
use include_trim::interrupt::install_interrupt_handler;
use include_trim::logging::{init_tracing, LogFormat};
use include_trim_core::services::PendingTrial;

/// Empirical `#include` minimizer for C/C++ source trees.
///
/// This CLI is a thin wrapper around `include-trim-core` (exposed in code as
/// `include_trim_core`). All substantive logic lives in the library so it can be tested
/// thoroughly and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "include-trim",
    version,
    about = "Remove #include directives a C/C++ project builds without",
    long_about = None
)]
struct Cli {
    /// Log filter used when RUST_LOG is not set (e.g. `info`, `debug`, `include_trim_core=debug`).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Log output format (logs are written to stderr).
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

/// Options shared by every command that reads the source tree.
#[derive(Args, Debug)]
struct TreeArgs {
    /// Project root directory. Defaults to the config file's root, else the current directory.
    #[arg(long)]
    root: Option<String>,

    /// YAML or JSON config file; command-line flags override its values.
    #[arg(long)]
    config: Option<String>,

    /// Source file suffix to consider (repeatable). Defaults to .c, .cpp, .h, .hpp.
    #[arg(long = "suffix")]
    suffixes: Vec<String>,

    /// Directory name to skip during discovery (repeatable), e.g. `third_party`.
    #[arg(long)]
    exclude: Vec<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Try removing every include and keep only the removals the build survives.
    ///
    /// Files are edited in place. Each trial runs the build command once with the project
    /// root as working directory; a non-zero exit status restores the include.
    Trim {
        #[command(flatten)]
        tree: TreeArgs,

        /// Shell command that builds the project; exit status 0 means success.
        #[arg(long)]
        build_command: Option<String>,

        /// Run the build once before editing and stop if it already fails.
        #[arg(long, default_value_t = false)]
        check_baseline: bool,

        /// Emit the run report as JSON instead of a text summary.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Also write the JSON run report to this file.
        #[arg(long)]
        report: Option<String>,
    },

    /// List discovered files and their include directives without modifying anything.
    Scan {
        #[command(flatten)]
        tree: TreeArgs,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Run the build command once and report whether it passes.
    Check {
        #[command(flatten)]
        tree: TreeArgs,

        /// Shell command that builds the project; exit status 0 means success.
        #[arg(long)]
        build_command: Option<String>,
    },
}

fn overrides(
    tree: TreeArgs,
    build_command: Option<String>,
    check_baseline: bool,
) -> ConfigOverrides {
    ConfigOverrides {
        root: tree.root,
        build_command,
        config: tree.config,
        suffixes: tree.suffixes,
        exclude: tree.exclude,
        check_baseline,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_format)?;

    match cli.command {
        Command::Trim { tree, build_command, check_baseline, json, report } => {
            let pending = PendingTrial::new();
            install_interrupt_handler(pending.clone());
            trim_command(
                &overrides(tree, build_command, check_baseline),
                json,
                report.as_deref(),
                &pending,
            )?
        }
        Command::Scan { tree, json } => scan_command(&overrides(tree, None, false), json)?,
        Command::Check { tree, build_command } => {
            check_command(&overrides(tree, build_command, false))?
        }
    }

    Ok(())
}
