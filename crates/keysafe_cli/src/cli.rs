//! Command-line surface of the KeySafe shell.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "keysafe", version, about = "Personal credential vault")]
pub struct Cli {
    /// Vault database file, or `:memory:` for a throwaway vault.
    #[arg(long, env = "KEYSAFE_DB", default_value = "keysafe.sqlite3", global = true)]
    pub db: String,

    /// trace|debug|info|warn|error; defaults per build mode.
    #[arg(long, env = "KEYSAFE_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "KEYSAFE_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Account sign-in used by every account-scoped command.
#[derive(Args, Debug, Clone)]
pub struct SignIn {
    #[arg(long, env = "KEYSAFE_LOGIN")]
    pub login: String,

    #[arg(long, env = "KEYSAFE_CREDENTIAL", hide_env_values = true)]
    pub credential: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account.
    Register {
        #[command(flatten)]
        sign_in: SignIn,
        /// Must repeat the credential.
        #[arg(long)]
        confirm: String,
    },
    /// List record names.
    List {
        #[command(flatten)]
        sign_in: SignIn,
    },
    /// Show one record with its secret.
    Show {
        #[command(flatten)]
        sign_in: SignIn,
        name: String,
    },
    /// List records whose name starts with PREFIX.
    Search {
        #[command(flatten)]
        sign_in: SignIn,
        /// Omit to list every record.
        prefix: Option<String>,
    },
    /// Add a record; names are unique across the whole vault.
    Add {
        #[command(flatten)]
        sign_in: SignIn,
        name: String,
        #[arg(value_name = "LOGIN")]
        record_login: String,
        #[arg(value_name = "SECRET")]
        secret: String,
    },
    /// Change name, login or secret of a record.
    Edit {
        #[command(flatten)]
        sign_in: SignIn,
        name: String,
        #[arg(long)]
        new_name: Option<String>,
        #[arg(long)]
        new_login: Option<String>,
        #[arg(long)]
        new_secret: Option<String>,
    },
    /// Delete a record.
    Delete {
        #[command(flatten)]
        sign_in: SignIn,
        name: String,
    },
    /// Delete the account and all of its records.
    RemoveAccount {
        #[command(flatten)]
        sign_in: SignIn,
        /// Re-entered credential.
        #[arg(long)]
        confirm: String,
    },
    /// Print the core version.
    Version,
}
