use std::path::PathBuf;

use clap::{Parser, Subcommand};
use vecta_client::oauth::OAuthProvider;
use vecta_core::models::UrlStatus;

#[derive(Parser, Debug)]
#[command(name = "vecta", version, about = "Manage Vecta projects and URLs")]
pub struct Cli {
    /// Backend base URL.
    #[arg(long, global = true, env = "VECTA_API_URL")]
    pub api_url: Option<String>,

    /// File holding the persisted session.
    #[arg(long, global = true, env = "VECTA_STORE_PATH")]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print version
    Version,

    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "VECTA_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account and sign in
    Register {
        #[arg(long)]
        email: String,
        #[arg(long, env = "VECTA_PASSWORD", hide_env_values = true)]
        password: String,
        /// Defaults to the password
        #[arg(long)]
        confirm_password: Option<String>,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Social login
    Oauth {
        #[command(subcommand)]
        command: OAuthCommands,
    },

    /// Manage projects
    Projects {
        #[command(subcommand)]
        command: ProjectCommands,
    },

    /// Manage the URLs of a project
    Urls {
        #[command(subcommand)]
        command: UrlCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum OAuthCommands {
    /// Print the provider authorization URL to open in a browser
    Url { provider: OAuthProvider },

    /// Complete the flow with the fragment of the redirect URL
    Callback { fragment: String },
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    List,
    Create { name: String },
    Show { project_id: String },
    Rename { project_id: String, name: String },
    Delete { project_id: String },
}

#[derive(Subcommand, Debug)]
pub enum UrlCommands {
    /// List URLs, optionally only those with one status
    List {
        project_id: String,
        #[arg(long)]
        status: Option<UrlStatus>,
    },

    /// Submit one URL
    Submit { project_id: String, url: String },

    /// Submit several URLs, one per line in `--file` or as arguments
    Batch {
        project_id: String,
        #[arg(long, conflicts_with = "urls")]
        file: Option<PathBuf>,
        urls: Vec<String>,
    },

    Show { project_id: String, url_id: String },
    Delete { project_id: String, url_id: String },

    /// Queue a URL for processing again
    Reprocess { project_id: String, url_id: String },

    /// Count URLs per status
    Stats { project_id: String },
}
