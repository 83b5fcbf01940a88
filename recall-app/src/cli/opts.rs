use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[command(name = "recall", version, about = "Flashcard decks with mastery-based review")]
pub struct Cli {
    /// Store file (defaults to the app data dir)
    #[arg(long, env = "RECALL_DATA_FILE", global = true)]
    pub data_file: Option<PathBuf>,

    /// Directory for timestamped backups (defaults next to the store file)
    #[arg(long, env = "RECALL_BACKUPS_DIR", global = true)]
    pub backups_dir: Option<PathBuf>,

    /// Number of backups to keep
    #[arg(long, env = "RECALL_MAX_BACKUPS", global = true)]
    pub max_backups: Option<usize>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Deck operations
    #[command(subcommand)]
    Deck(DeckCmd),
    /// Card operations
    #[command(subcommand)]
    Card(CardCmd),
    /// Search cards across all decks
    Search { query: String },
    /// Per-deck progress
    Stats {
        #[arg(long)]
        deck: Option<String>,
    },
    /// Interactive review session
    Review(ReviewCmd),
    /// Languages available for translation
    Languages,
}

#[derive(Debug, Subcommand, Clone)]
pub enum DeckCmd {
    Add {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    List,
    Edit {
        deck: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    Rm { deck: String },
    /// Make a deck the current one
    Use { deck: String },
}

#[derive(Debug, Subcommand, Clone)]
pub enum CardCmd {
    Add(CardAdd),
    List {
        #[arg(long)]
        deck: Option<String>,
        #[arg(long)]
        query: Option<String>,
    },
    Edit(CardEdit),
    Rm {
        card_id: String,
        #[arg(long)]
        deck: String,
    },
}

#[derive(Debug, Args, Clone)]
pub struct CardAdd {
    #[arg(long)]
    pub deck: String,
    #[arg(long)]
    pub front: String,
    #[arg(long)]
    pub back: String,
}

#[derive(Debug, Args, Clone)]
pub struct CardEdit {
    pub card_id: String,
    #[arg(long)]
    pub deck: String,
    #[arg(long)]
    pub front: Option<String>,
    #[arg(long)]
    pub back: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct ReviewCmd {
    /// Deck to review (defaults to the current deck)
    #[arg(long)]
    pub deck: Option<String>,
}
