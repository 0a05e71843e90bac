use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "shelf")]
#[command(about = "Write documents and keep them in sync with a Shelf store")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Store base URL (overrides profile and SHELF_API_BASE_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// CLI profile name
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,

    /// Log in with email and token before running the command
    #[arg(long, global = true, value_name = "EMAIL", requires = "token")]
    pub email: Option<String>,

    /// Token or password used with --email
    #[arg(
        long,
        global = true,
        value_name = "TOKEN",
        env = "SHELF_TOKEN",
        hide_env_values = true
    )]
    pub token: Option<String>,

    /// Sign in with an external identity token before running the command (ignored with --email)
    #[arg(
        long,
        global = true,
        value_name = "TOKEN",
        env = "SHELF_IDENTITY_TOKEN",
        hide_env_values = true
    )]
    pub identity_token: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the signed-in user
    Whoami,
    /// List documents in the store
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a stored document
    Get {
        /// Document ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Save a new document
    #[command(alias = "new")]
    Submit {
        /// Document title
        #[arg(long)]
        title: String,
        /// Explicit path (derived from the title when omitted)
        #[arg(long)]
        path: Option<String>,
        /// Document content (read from piped stdin when omitted)
        #[arg(long)]
        content: Option<String>,
        /// Retry the save with the configured retry policy
        #[arg(long)]
        retry: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a stored document
    Delete {
        /// Document ID
        id: String,
    },
    /// Print the path a title would be given
    Slug {
        /// Title words
        #[arg(required = true, trailing_var_arg = true)]
        title: Vec<String>,
    },
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update a profile
    Init {
        /// Profile name to initialize
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
        /// Store base URL
        #[arg(long, value_name = "URL")]
        api_base_url: Option<String>,
        /// Attempts for retried operations
        #[arg(long, value_name = "N")]
        retries: Option<u32>,
        /// Fixed wait between attempts in milliseconds
        #[arg(long, value_name = "MS")]
        retry_wait_ms: Option<u64>,
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
    /// Show the resolved configuration for a profile
    Show {
        /// Optional profile override
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
    },
}
