//! Clap derive structures for the `parasempre` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// parasempre -- wedding guest directory from the command line
#[derive(Debug, Parser)]
#[command(
    name = "parasempre",
    version,
    about = "Manage the Para Sempre wedding guest directory",
    long_about = "Administers the wedding guest list kept by the Para Sempre service.\n\n\
        Mutating commands attach the RACF identification configured with\n\
        `parasempre identity set`; reads work without one.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Guest service base URL (overrides the settings file)
    #[arg(long, env = "PARASEMPRE_API_BASE", global = true)]
    pub api_base: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "PARASEMPRE_TIMEOUT_SECS", global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PARASEMPRE_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// Side of the couple, spelled the way invitations spell it.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SideArg {
    /// Groom's side
    Noivo,
    /// Bride's side
    Noiva,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the guest list
    #[command(alias = "g")]
    Guests(GuestsArgs),

    /// Manage the stored RACF identification
    #[command(alias = "id")]
    Identity(IdentityArgs),

    /// Directory users and their roles
    Users(UsersArgs),

    /// Show the configured identity and its resolved role
    Whoami,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  GUESTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct GuestsArgs {
    #[command(subcommand)]
    pub command: GuestsCommand,
}

#[derive(Debug, Subcommand)]
pub enum GuestsCommand {
    /// List guests
    #[command(alias = "ls")]
    List {
        /// Match against guest names or phone digits
        #[arg(long, short = 's')]
        search: Option<String>,

        /// Only guests from one side of the couple
        #[arg(long, value_enum)]
        side: Option<SideArg>,

        /// Only confirmed guests
        #[arg(long, conflicts_with = "pending")]
        confirmed: bool,

        /// Only guests still pending confirmation
        #[arg(long)]
        pending: bool,
    },

    /// Get guest details
    Get {
        /// Guest id
        id: i64,
    },

    /// Create a guest
    Create {
        /// Given name
        #[arg(long, required = true)]
        first_name: String,

        /// Family name
        #[arg(long, required = true)]
        last_name: String,

        /// Phone number, 11 digits (punctuation is ignored)
        #[arg(long)]
        phone: Option<String>,

        /// Side of the couple
        #[arg(long, required = true, value_enum)]
        side: SideArg,

        /// Family group number (server picks one when omitted)
        #[arg(long)]
        family_group: Option<i64>,
    },

    /// Update a guest (at least one field)
    Update {
        /// Guest id
        id: i64,

        /// New given name
        #[arg(long)]
        first_name: Option<String>,

        /// New family name
        #[arg(long)]
        last_name: Option<String>,

        /// New phone number, 11 digits
        #[arg(long, conflicts_with = "clear_phone")]
        phone: Option<String>,

        /// Remove the stored phone number
        #[arg(long)]
        clear_phone: bool,

        /// New side of the couple
        #[arg(long, value_enum)]
        side: Option<SideArg>,

        /// New family group number
        #[arg(long)]
        family_group: Option<i64>,

        /// Set the confirmation flag
        #[arg(long, action = clap::ArgAction::Set)]
        confirmed: Option<bool>,
    },

    /// Mark a guest as confirmed
    Confirm {
        /// Guest id
        id: i64,
    },

    /// Mark a guest as pending again
    Unconfirm {
        /// Guest id
        id: i64,
    },

    /// Delete one or more guests
    #[command(alias = "rm")]
    Delete {
        /// Guest ids
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// List the members of a family group
    Family {
        /// Family group number
        group: i64,

        /// Guest id to leave out of the listing
        #[arg(long)]
        exclude: Option<i64>,
    },

    /// Import guests from a CSV or XLSX file
    Import {
        /// Path to the guest list file
        file: PathBuf,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  IDENTITY
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct IdentityArgs {
    #[command(subcommand)]
    pub command: IdentityCommand,
}

#[derive(Debug, Subcommand)]
pub enum IdentityCommand {
    /// Store the RACF identification used on mutating requests
    Set {
        /// Five-character alphanumeric code
        racf: String,
    },

    /// Show the stored identification
    Show,

    /// Remove the stored identification
    Clear,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  USERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List directory users
    #[command(alias = "ls")]
    List,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
