use clap::{Parser, Subcommand};
use quintle_types::EntityKind;

#[derive(Parser)]
#[command(name = "quintle")]
#[command(about = "Quintle chain aggregation CLI", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true, env = "QUINTLE_CONFIG", default_value = "quintle.toml")]
    pub config: String,

    /// Override the chain RPC URL from the configuration
    #[arg(long, global = true, env = "QUINTLE_RPC_URL")]
    pub rpc_url: Option<String>,

    /// Private key for signing transactions
    #[arg(long, global = true, env = "QUINTLE_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    #[arg(long, global = true, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the entities of one kind, newest first
    List {
        /// quest, airdrop, bounty, grant, campaign or funding-request
        kind: EntityKind,

        /// Only entities still open
        #[arg(long, conflicts_with = "past")]
        active: bool,

        /// Only resolved, cancelled or expired entities
        #[arg(long)]
        past: bool,

        /// Print JSON instead of a table
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// List the sub-collection items of one entity
    Items {
        kind: EntityKind,

        /// Entity ID
        id: u64,

        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Keep a collection fresh from chain events and print every change
    Watch {
        kind: EntityKind,

        /// Polling interval override in seconds
        #[arg(long)]
        poll_secs: Option<u64>,
    },

    /// Show withdrawable balances summed across source contracts
    Balances {
        /// Account to inspect (defaults to the signer address)
        #[arg(long, env = "QUINTLE_ACCOUNT")]
        account: Option<String>,

        /// Keep refreshing until interrupted
        #[arg(long, default_value = "false")]
        watch: bool,
    },

    /// Withdraw the whole pending balance of a token from one source
    Withdraw {
        /// Token symbol or address
        #[arg(long)]
        token: String,
    },

    /// Upload a file (and optional JSON sidecar) to IPFS
    Upload {
        /// File to upload
        file: String,

        /// JSON metadata; when set, a sidecar referencing the file is pinned too
        #[arg(long)]
        metadata: Option<String>,

        #[arg(long, env = "PINATA_JWT", hide_env_values = true)]
        jwt: Option<String>,
    },

    /// Read a JSON document from the IPFS gateway
    Fetch {
        cid: String,
    },

    /// Show the verification record of an address
    Verification {
        address: String,
    },

    /// List known networks
    Networks,

    /// Make the node wallet switch to a known network, adding it when unknown
    SwitchNetwork {
        /// Network name (see `networks`)
        network: String,
    },

    /// Linked social accounts
    Social {
        #[command(subcommand)]
        command: SocialCommands,
    },
}

#[derive(Subcommand)]
pub enum SocialCommands {
    /// Run the OAuth handshake; popup messages are read from stdin, one JSON per line
    Connect {
        provider: String,

        /// Origin the messages are attributed to
        #[arg(long)]
        origin: Option<String>,

        /// Wallet address to link the account to
        #[arg(long, env = "QUINTLE_ACCOUNT")]
        account: Option<String>,
    },

    /// List linked accounts
    List,

    /// Unlink an account
    Disconnect {
        provider: String,
    },

    /// Print an authorization URL with fresh PKCE parameters
    AuthorizeUrl {
        provider: String,
    },

    /// Exchange an authorization code for tokens
    Exchange {
        provider: String,

        #[arg(long)]
        code: String,

        #[arg(long)]
        verifier: String,
    },
}
