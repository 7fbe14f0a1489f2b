use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "graphlink",
    version,
    about = "Call Microsoft Graph operations with a stored access token"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the operations the plugin exposes
    Operations,
    /// Call one operation and print the result envelope as JSON
    Call(CallArgs),
}

#[derive(clap::Args)]
pub struct CallArgs {
    /// Operation name, e.g. me, me_messages (see `graphlink operations`)
    pub operation: String,

    /// Microsoft Graph access token for the linked account
    #[arg(long, env = "GRAPHLINK_TOKEN")]
    pub token: String,

    /// Override the Graph API root (testing against a stub)
    #[arg(long, env = "GRAPHLINK_BASE_URL")]
    pub base_url: Option<String>,

    /// Log outbound requests and responses at debug level
    #[arg(long)]
    pub debug_logs: bool,

    /// OData $select, e.g. "subject,start"
    #[arg(long)]
    pub select: Option<String>,

    /// OData $filter expression
    #[arg(long)]
    pub filter: Option<String>,

    /// OData $expand
    #[arg(long)]
    pub expand: Option<String>,

    /// OData $orderby, e.g. "receivedDateTime desc"
    #[arg(long)]
    pub orderby: Option<String>,

    /// OData $top page size (1-999)
    #[arg(long)]
    pub top: Option<u32>,

    /// OData $skip page offset
    #[arg(long)]
    pub skip: Option<u32>,

    /// OData $search expression
    #[arg(long)]
    pub search: Option<String>,

    /// OData $count flag
    #[arg(long)]
    pub count: Option<bool>,
}
