//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--store-file <path>`: Use a different merchant registry
//! - `--debug`: Enable debug logging
//! - `--interactive` / `--no-interactive`: Control prompts
//! - `--quiet` / `-q`: Minimal output
//!
//! Running `sp` with no subcommand behaves like `sp search`.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Keep a registry of Shopify merchants and run Shopify CLI commands against them
#[derive(Parser, Debug)]
#[command(name = "sp")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Use this merchant registry instead of ~/.shopify-partner/stores.json
    #[arg(long, global = true, value_name = "PATH")]
    pub store_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output; implies --no-interactive
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable interactive prompts
    #[arg(
        long = "interactive",
        global = true,
        conflicts_with = "no_interactive"
    )]
    pub interactive_flag: bool,

    /// Disable interactive prompts
    #[arg(long, global = true)]
    pub no_interactive: bool,

    #[command(flatten)]
    pub search: SearchArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Determine if interactive mode is enabled.
    ///
    /// Returns true if:
    /// - `--interactive` was explicitly set, OR
    /// - Neither `--no-interactive` nor `--quiet` was set, the config
    ///   default allows it, AND stdin is a TTY
    pub fn interactive(&self, config_default: bool) -> bool {
        if self.interactive_flag {
            true
        } else if self.no_interactive || self.quiet {
            false
        } else {
            config_default && std::io::stdin().is_terminal()
        }
    }
}

/// Arguments of the search command, also accepted with no subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    /// Optional search query to filter merchants
    pub query: Option<String>,

    /// Open stores.json in your code editor
    #[arg(short, long)]
    pub open: bool,

    /// Run this theme command without showing the command menu
    #[arg(long = "command", value_enum, value_name = "COMMAND")]
    pub theme: Option<ThemeCommand>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search for merchants and execute Shopify CLI commands
    #[command(
        name = "search",
        long_about = "Search for a merchant and run a Shopify CLI theme command against it.\n\n\
            With a query, merchants are fuzzy-matched on name and handle. A single \
            match is selected straight away; otherwise an incremental search prompt \
            lets you pick one. This is also what `sp` does with no subcommand.",
        after_help = "\
EXAMPLES:
    # Pick from every merchant
    sp

    # Narrow by name or handle first
    sp acme

    # Skip the command menu
    sp acme --command dev

    # Edit the registry by hand
    sp --open"
    )]
    Search(SearchArgs),

    /// Add a new merchant to the registry
    #[command(
        name = "add",
        after_help = "\
EXAMPLES:
    sp add \"Acme Co\" acme-store"
    )]
    Add {
        /// Merchant name
        name: String,

        /// Shopify store handle (e.g., \"acme-store\")
        handle: String,
    },

    /// Bulk add merchants from a CSV or JSON file
    #[command(
        name = "bulk-add",
        long_about = "Bulk add merchants from a CSV or JSON file.\n\n\
            CSV files hold one `name,handle` pair per line; a header line and \
            lines starting with # are skipped. JSON files hold an array of \
            objects with `name` and `handle` fields. Handles that already exist \
            are skipped. Any other bad row is reported and makes the command \
            exit with status 1 after the rest of the file is processed.",
        after_help = "\
EXAMPLES:
    sp bulk-add merchants.csv
    sp bulk-add merchants.json --skip-validation
    sp bulk-add export.txt --format csv"
    )]
    BulkAdd {
        /// Path to CSV or JSON file
        file: PathBuf,

        /// File format. Auto-detected from the extension if not specified
        #[arg(long, value_enum)]
        format: Option<FormatArg>,

        /// Skip store validation (faster but no URL detection)
        #[arg(long)]
        skip_validation: bool,
    },

    /// List all merchants
    #[command(name = "list")]
    List,

    /// Remove a merchant from the registry
    #[command(
        name = "remove",
        after_help = "\
EXAMPLES:
    # Pick interactively
    sp remove

    # Remove the single match without confirming
    sp remove acme --yes"
    )]
    Remove {
        /// Optional name or handle to filter merchants
        query: Option<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Get, set, or list configuration values
    #[command(
        name = "config",
        after_help = "\
EXAMPLES:
    sp config list
    sp config set editor code
    sp config get validation_timeout_secs
    sp config path"
    )]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
EXAMPLES:
    # Bash (add to ~/.bashrc)
    sp completion bash >> ~/.bashrc

    # Zsh (add to ~/.zshrc)
    sp completion zsh >> ~/.zshrc

    # Fish
    sp completion fish > ~/.config/fish/completions/sp.fish"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Shopify CLI theme commands offered for a merchant
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeCommand {
    /// shopify theme dev
    Dev,
    /// shopify theme pull
    Pull,
    /// shopify theme push
    Push,
}

/// Import file format
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Csv,
    Json,
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },
    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Value to set
        value: String,
    },
    /// List all configuration values
    List,
    /// Print the path config is read from and written to
    Path,
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("sp").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_query_without_subcommand() {
        let cli = parse(&["acme", "--command", "pull"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.search.query.as_deref(), Some("acme"));
        assert_eq!(cli.search.theme, Some(ThemeCommand::Pull));
    }

    #[test]
    fn open_flag() {
        let cli = parse(&["-o"]);
        assert!(cli.search.open);
        assert!(cli.search.query.is_none());
    }

    #[test]
    fn bulk_add_flags() {
        let cli = parse(&["bulk-add", "m.txt", "--format", "json", "--skip-validation"]);
        match cli.command {
            Some(Command::BulkAdd {
                file,
                format,
                skip_validation,
            }) => {
                assert_eq!(file, PathBuf::from("m.txt"));
                assert_eq!(format, Some(FormatArg::Json));
                assert!(skip_validation);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse(&["list", "--store-file", "/tmp/s.json", "-q"]);
        assert!(matches!(cli.command, Some(Command::List)));
        assert_eq!(cli.store_file, Some(PathBuf::from("/tmp/s.json")));
        assert!(cli.quiet);
    }

    #[test]
    fn quiet_disables_interactive() {
        let cli = parse(&["-q"]);
        assert!(!cli.interactive(true));

        let cli = parse(&["--interactive"]);
        assert!(cli.interactive(false));

        let cli = parse(&["--no-interactive"]);
        assert!(!cli.interactive(true));
    }

    #[test]
    fn interactive_flags_conflict() {
        let result = Cli::try_parse_from(["sp", "--interactive", "--no-interactive"]);
        assert!(result.is_err());
    }
}
