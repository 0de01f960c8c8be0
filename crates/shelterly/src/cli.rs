//! Clap derive structures for the `shelterly` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// shelterly -- shelter availability and bed reservations from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "shelterly",
    version,
    about = "Find shelter beds, register clients, and reserve from the command line",
    long_about = "A case-management console for homeless-services teams.\n\n\
        Browse shelter availability, register clients, reserve beds, and\n\
        work the task board against a Shelterly backend.",
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
    /// Backend profile to use
    #[arg(long, short = 'p', env = "SHELTERLY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend base URL (overrides profile)
    #[arg(long, short = 'u', env = "SHELTERLY_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SHELTERLY_OUTPUT",
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

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "SHELTERLY_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "SHELTERLY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
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

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse shelters and reserve beds
    #[command(alias = "sh", alias = "s")]
    Shelters(SheltersArgs),

    /// Register and look up clients
    #[command(alias = "cl")]
    Clients(ClientsArgs),

    /// Browse, assign, and complete work-opportunity tasks
    #[command(alias = "t")]
    Tasks(TasksArgs),

    /// Maintain shelters and tasks (admin role)
    Admin(AdminArgs),

    /// Occupancy and task summaries (admin role)
    #[command(alias = "stats")]
    Analytics(AnalyticsArgs),

    /// Log in with a demo account
    Login(LoginArgs),

    /// Discard the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SHELTERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SheltersArgs {
    #[command(subcommand)]
    pub command: SheltersCommand,
}

#[derive(Debug, Subcommand)]
pub enum SheltersCommand {
    /// List every shelter
    #[command(alias = "ls")]
    List(LocalFilterArgs),

    /// Server-side search by type and flags
    Search {
        /// Shelter type (e.g. congregate, tiny_home, safe_parking)
        #[arg(long = "type", short = 't')]
        shelter_type: Option<String>,

        /// Only shelters that allow pets
        #[arg(long)]
        pets: bool,

        /// Only shelters that allow partners
        #[arg(long)]
        partner: bool,

        /// Only active shelters
        #[arg(long)]
        active: bool,

        #[command(flatten)]
        filter: LocalFilterArgs,
    },

    /// Show shelter details
    Get {
        /// Shelter ID
        shelter: String,
    },

    /// Register a client and reserve one bed for them
    Reserve {
        /// Shelter ID
        shelter: String,

        /// Client name (prompted when omitted)
        #[arg(long, short = 'n')]
        name: Option<String>,

        /// Reserve for an already-registered client instead of registering one
        #[arg(long, short = 'c', conflicts_with = "name")]
        client: Option<String>,

        /// Caseworker notes for the new client
        #[arg(long, default_value = "")]
        notes: String,
    },
}

/// Client-side narrowing applied after the fetch.
#[derive(Debug, Args)]
pub struct LocalFilterArgs {
    /// Case-insensitive substring of name, address, or city
    #[arg(long, short = 'f')]
    pub filter: Option<String>,

    /// Keep only one shelter type
    #[arg(long = "only-type")]
    pub only_type: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CLIENTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ClientsArgs {
    #[command(subcommand)]
    pub command: ClientsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ClientsCommand {
    /// List registered clients
    #[command(alias = "ls")]
    List,

    /// Show client details
    Get {
        /// Client ID
        client: String,
    },

    /// Register a client without reserving a bed
    Register {
        /// Client name
        name: String,

        /// Caseworker notes
        #[arg(long, default_value = "")]
        notes: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TASKS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TasksArgs {
    #[command(subcommand)]
    pub command: TasksCommand,
}

#[derive(Debug, Subcommand)]
pub enum TasksCommand {
    /// List tasks
    #[command(alias = "ls")]
    List,

    /// Show task details
    Get {
        /// Task ID
        task: String,
    },

    /// Assign an open task to a client
    Assign {
        /// Task ID
        task: String,

        /// Client ID
        #[arg(long, short = 'c')]
        client: String,
    },

    /// Mark an assigned task completed
    Complete {
        /// Task ID
        task: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ADMIN
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub command: AdminCommand,
}

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Create, update, or delete shelters
    Shelters {
        #[command(subcommand)]
        command: AdminSheltersCommand,
    },

    /// Create, update, or delete tasks
    Tasks {
        #[command(subcommand)]
        command: AdminTasksCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum AdminSheltersCommand {
    /// Create a shelter
    Create(ShelterFormArgs),

    /// Update a shelter; omitted fields keep their current value
    Update {
        /// Shelter ID
        shelter: String,

        #[command(flatten)]
        form: ShelterFormArgs,
    },

    /// Delete a shelter
    Delete {
        /// Shelter ID
        shelter: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum AdminTasksCommand {
    /// Create a task
    Create(TaskFormArgs),

    /// Update a task; omitted fields keep their current value
    Update {
        /// Task ID
        task: String,

        #[command(flatten)]
        form: TaskFormArgs,
    },

    /// Delete a task
    Delete {
        /// Task ID
        task: String,
    },
}

#[derive(Debug, Default, Args)]
pub struct ShelterFormArgs {
    /// Shelter name
    #[arg(long)]
    pub name: Option<String>,

    /// Street address
    #[arg(long)]
    pub address: Option<String>,

    /// Second address line
    #[arg(long)]
    pub address2: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub state: Option<String>,

    /// ZIP code (12345 or 12345-6789)
    #[arg(long)]
    pub zip: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    pub latitude: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    pub longitude: Option<String>,

    /// Total beds
    #[arg(long)]
    pub capacity: Option<String>,

    /// Beds currently free
    #[arg(long)]
    pub availability: Option<String>,

    /// Shelter type
    #[arg(long = "type")]
    pub shelter_type: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    /// Operating organization
    #[arg(long)]
    pub organization: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Whether pets are allowed
    #[arg(long)]
    pub allows_pets: Option<bool>,

    /// Whether partners are allowed
    #[arg(long)]
    pub allows_partner: Option<bool>,

    /// Whether the shelter is active
    #[arg(long)]
    pub active: Option<bool>,
}

#[derive(Debug, Default, Args)]
pub struct TaskFormArgs {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    /// Start time, e.g. "2025-04-12 09:00"
    #[arg(long)]
    pub scheduled_at: Option<String>,

    /// Estimated duration, e.g. "3 hours"
    #[arg(long)]
    pub duration: Option<String>,

    /// Compensation details
    #[arg(long)]
    pub compensation: Option<String>,

    #[arg(long)]
    pub contact_name: Option<String>,

    #[arg(long)]
    pub contact_phone: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ANALYTICS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AnalyticsArgs {
    #[command(subcommand)]
    pub command: AnalyticsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AnalyticsCommand {
    /// Overall shelter capacity and occupancy
    Shelters,

    /// Capacity and occupancy per shelter type
    Types,

    /// Task counts by status
    Tasks,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AUTH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email (defaults to the profile's email)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Role to log in as: caseworker or admin
    #[arg(long, short = 'r')]
    pub role: Option<String>,

    /// Read the password from stdin instead of prompting
    #[arg(long)]
    pub password_stdin: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Set a value on the active profile
    Set {
        /// Profile key (api_url, email, role, insecure, timeout, ca_cert)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store the login password in the system keyring
    SetPassword {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
