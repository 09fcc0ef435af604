use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::api::DEFAULT_GEMINI_MODEL;

/// Placeholder shipped in the sample `.env`; treated as "no key".
pub const GEMINI_KEY_PLACEHOLDER: &str = "your_gemini_api_key_here";

/// ColabHub - MCP server bridging Google Colab, GitHub and Gemini
#[derive(Parser)]
#[command(name = "colabhub")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub settings: Settings,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the MCP server over stdio (default)
    Serve,
    /// Show which external services are configured
    Status,
}

/// Service credentials and options, read from flags or the environment.
#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// GitHub personal access token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Gemini model used for analysis and README generation
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
    pub gemini_model: String,

    /// Directory holding the Google authorized-user token file
    #[arg(long, env = "GOOGLE_CREDENTIALS_DIR", default_value = "CREDENTIALS")]
    pub google_credentials_dir: PathBuf,

    /// Name of the Google token file inside the credentials directory
    #[arg(long, env = "GOOGLE_TOKEN_FILE", default_value = "token.json")]
    pub google_token_file: String,
}

impl Settings {
    pub fn github_token(&self) -> Option<&str> {
        self.github_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    pub fn gemini_api_key(&self) -> Option<&str> {
        self.gemini_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && *k != GEMINI_KEY_PLACEHOLDER)
    }

    pub fn google_token_path(&self) -> PathBuf {
        self.google_credentials_dir.join(&self.google_token_file)
    }
}
