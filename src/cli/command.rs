use crate::config::Config;
use crate::interchange::CsvDialect;
use crate::prelude::{AppError, SortMode, StorageMedium};
use crate::storage::json::DEFAULT_JSON_PATH;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rusty-contacts", version, about = "Personal contact book")]
pub struct Cli {
    /// Storage choice (mem, json, remote) are available
    #[arg(long, env = "STORAGE_CHOICE", default_value_t = String::from("json"))]
    pub storage_choice: String,

    /// Location of the JSON store
    #[arg(long, env = "JSON_STORAGE_PATH", default_value = DEFAULT_JSON_PATH)]
    pub json_path: PathBuf,

    /// Base URL of the remote document store
    #[arg(long, env = "REMOTE_STORAGE_URL")]
    pub remote_url: Option<String>,

    /// API key sent to the remote document store
    #[arg(long, env = "REMOTE_API_KEY", hide_env_values = true)]
    pub remote_api_key: Option<String>,

    /// CSV flavor for import and export (legacy, rfc4180)
    #[arg(long, env = "CSV_DIALECT", default_value_t = String::from("legacy"))]
    pub csv_dialect: String,

    /// Id of the signed-in user, as issued by the identity provider
    #[arg(short, long, env = "ROLODEX_USER")]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommand and their flags
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new contact
    Add {
        /// Contact name
        #[arg(long)]
        name: String,

        /// Contact email address
        #[arg(long)]
        email: Option<String>,

        /// Contact phone number
        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        address: Option<String>,

        #[arg(long)]
        company: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        /// Tag, repeat for several (--tag work --tag gym)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Reminder time (RFC 3339, YYYY-MM-DDTHH:MM or YYYY-MM-DD)
        #[arg(long)]
        reminder: Option<String>,

        /// Avatar URL or data: payload
        #[arg(long)]
        avatar: Option<String>,
    },
    /// List contacts
    List {
        /// Keep only contacts matching this text
        #[arg(short, long)]
        search: Option<String>,

        /// Sort ordering
        #[arg(long, value_enum, default_value_t = SortKey::Name)]
        sort: SortKey,
    },
    /// Show one contact in full
    Show {
        /// Contact id
        id: String,
    },
    /// Edit the fields of an existing contact.
    /// Pass an empty value (--email "") to clear a field
    Edit {
        /// Contact id
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        address: Option<String>,

        #[arg(long)]
        company: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        /// Replace all tags, repeat for several
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Remove every tag
        #[arg(long, conflicts_with = "tags")]
        clear_tags: bool,

        #[arg(long)]
        reminder: Option<String>,

        #[arg(long)]
        avatar: Option<String>,
    },
    /// Delete a contact by id
    Delete {
        /// Contact id
        id: String,
    },

    /// Import contacts from .csv file
    Import {
        /// File path to the source .csv file
        #[arg(short, long)]
        src: PathBuf,
    },

    /// Export contacts to a .csv file, or stdout when no destination is given
    Export {
        /// File path to the destination location for export file
        #[arg(short, long)]
        des: Option<PathBuf>,
    },

    /// Contacts whose reminder is due around now
    Reminders {
        /// Seconds either side of now
        #[arg(long, default_value_t = crate::domain::search::DEFAULT_REMINDER_WINDOW_SECS)]
        window: i64,
    },
}

/// Supported sort keys
#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum SortKey {
    Name,
    Recent,
}

impl From<SortKey> for SortMode {
    fn from(key: SortKey) -> Self {
        match key {
            SortKey::Name => SortMode::Name,
            SortKey::Recent => SortMode::Recent,
        }
    }
}

impl Cli {
    pub fn config(&self) -> Result<Config, AppError> {
        Ok(Config {
            storage: StorageMedium::from(&self.storage_choice)?,
            json_path: self.json_path.clone(),
            remote_url: self.remote_url.clone(),
            remote_api_key: self.remote_api_key.clone(),
            csv_dialect: CsvDialect::from(&self.csv_dialect)?,
        })
    }
}
