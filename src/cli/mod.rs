//! CLI interface for Longbox.

pub mod handlers;
pub mod output;
pub mod resolve;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::init::AppContext;
use output::OutputMode;

/// Longbox - comic catalog backend: series, installments, reading threads,
/// and character appearance tracking
#[derive(Parser)]
#[command(name = "longbox", version, about, long_about = None)]
pub struct Cli {
    /// Override data directory (default: ~/.longbox)
    #[arg(long, env = "LONGBOX_DATA_PATH", global = true)]
    pub data_path: Option<PathBuf>,

    /// Output as JSON instead of human-readable format
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Series management
    #[command(subcommand)]
    Series(SeriesCommands),

    /// Installment management
    #[command(subcommand)]
    Installment(InstallmentCommands),

    /// Cross-series reading orders
    #[command(subcommand)]
    Thread(ThreadCommands),

    /// Character management
    #[command(subcommand)]
    Character(CharacterCommands),

    /// Persona management
    #[command(subcommand)]
    Persona(PersonaCommands),

    /// Per-page appearance ranges
    #[command(subcommand)]
    Appearance(AppearanceCommands),

    /// Creator credits
    #[command(subcommand)]
    Credit(CreditCommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum SeriesCommands {
    /// Create a new series
    Create {
        /// Display name
        name: String,
        /// URL slug (derived from the name if omitted)
        #[arg(long)]
        slug: Option<String>,
        /// What this series calls its installments
        #[arg(long, default_value = "issue")]
        label: String,
        /// Right-to-left reading direction
        #[arg(long)]
        rtl: bool,
    },
    /// List all series
    List,
    /// Show one series and its installments
    Get {
        /// Series slug or name
        series: String,
    },
    /// Re-seed a strip series from loose images (replaces all installments)
    Strip {
        /// Series slug or name
        series: String,
        /// Image files, one per strip installment
        files: Vec<PathBuf>,
    },
    /// Delete a series and everything it owns
    Delete {
        /// Series slug or name
        series: String,
    },
}

#[derive(Subcommand)]
pub enum InstallmentCommands {
    /// Create a new installment
    Create {
        /// Series slug or name
        series: String,
        /// Number ("7", "7-11", or "7.5"); required if no title
        #[arg(long)]
        number: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        synopsis: Option<String>,
        /// Release date/time (RFC 3339)
        #[arg(long)]
        release: Option<String>,
    },
    /// Update an installment's fields
    Update {
        /// Installment key, or series/number ("MOON/7-11")
        installment: String,
        /// New number; pass "none" to clear it
        #[arg(long)]
        number: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        synopsis: Option<String>,
    },
    /// List a series's installments in display order
    List {
        /// Series slug or name
        series: String,
    },
    /// Replace an installment's pages from uploaded files
    Ingest {
        /// Installment key, or series/number
        installment: String,
        /// Image files or one PDF
        files: Vec<PathBuf>,
        /// Page count when ingesting a PDF
        #[arg(long)]
        pdf_pages: Option<i64>,
    },
    /// List an installment's pages
    Pages {
        /// Installment key, or series/number
        installment: String,
    },
    /// Suggest the next number for a series
    NextNumber {
        /// Series slug or name
        series: String,
    },
    /// Delete an installment and everything it owns
    Delete {
        /// Installment key, or series/number
        installment: String,
    },
}

#[derive(Subcommand)]
pub enum ThreadCommands {
    /// Create a new reading-order thread
    Create {
        name: String,
        /// URL slug (derived from the name if omitted)
        #[arg(long)]
        slug: Option<String>,
        #[arg(long)]
        synopsis: Option<String>,
        /// Mark as the canonical reading order
        #[arg(long)]
        primary: bool,
    },
    /// List all threads
    List,
    /// Append a run of installments to a thread
    AddRun {
        /// Thread slug
        thread: String,
        /// First installment of the run (key or series/number)
        begin: String,
        /// Last installment of the run; defaults to begin
        #[arg(long)]
        end: Option<String>,
    },
    /// Show a thread's full reading order
    Order {
        /// Thread slug
        thread: String,
    },
    /// Delete a thread and its runs
    Delete {
        /// Thread slug
        thread: String,
    },
}

#[derive(Subcommand)]
pub enum CharacterCommands {
    /// Create a character with its first (primary) persona
    Create {
        /// Primary persona name
        name: String,
        #[arg(long, default_value = "")]
        bio: String,
    },
    /// List all characters
    List,
    /// Show one character, its personas, and first issues
    Get {
        /// Character id or persona name
        character: String,
    },
    /// Change which persona is primary
    SetPrimary {
        /// Character id or persona name
        character: String,
        /// Persona id or name
        persona: String,
    },
    /// Copy the primary persona's creators to creatorless personas
    Backfill {
        /// Character id or persona name
        character: String,
    },
    /// First installment of each series the character appears in
    FirstIssues {
        /// Character id or persona name
        character: String,
    },
    /// Delete a character, its personas, and their appearances
    Delete {
        /// Character id or persona name
        character: String,
    },
}

#[derive(Subcommand)]
pub enum PersonaCommands {
    /// Add a persona to an existing character
    Add {
        /// Character id or persona name
        character: String,
        /// Persona name
        name: String,
        /// given_name, super_identity, personality, title, alias, or role
        #[arg(long, default_value = "given_name")]
        kind: String,
    },
    /// List personas, optionally for one character
    List {
        /// Character id or persona name
        #[arg(long)]
        character: Option<String>,
    },
    /// Delete a persona (primary personas are protected)
    Delete {
        /// Persona id or name
        persona: String,
    },
}

#[derive(Subcommand)]
pub enum AppearanceCommands {
    /// Replace an installment's appearance ranges
    ///
    /// Ranges are "persona:begin:end[:type]" (repeatable), or a YAML file of
    /// {persona, begin, end, type} entries. The submission replaces all
    /// existing appearances for the installment.
    Set {
        /// Installment key, or series/number
        installment: String,
        /// Inline range entries ("Dark Claw:0:4:normal")
        #[arg(long = "range")]
        ranges: Vec<String>,
        /// YAML file of range entries
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Show an installment's appearances as collapsed ranges
    List {
        /// Installment key, or series/number
        installment: String,
    },
}

#[derive(Subcommand)]
pub enum CreditCommands {
    /// Register a creator
    AddCreator {
        /// Working name
        name: String,
    },
    /// Register a role type
    AddRole {
        name: String,
        /// Display order among role types
        #[arg(long, default_value = "0")]
        order: i64,
    },
    /// Credit a creator with a role on an installment
    Add {
        /// Installment key, or series/number
        installment: String,
        /// Creator working name
        creator: String,
        /// Role name
        role: String,
    },
    /// List an installment's credits
    List {
        /// Installment key, or series/number
        installment: String,
    },
}

/// Dispatch a parsed command against an initialized context.
pub async fn execute(command: &Commands, ctx: &AppContext, mode: OutputMode) -> anyhow::Result<()> {
    match command {
        Commands::Series(cmd) => handlers::series::handle(cmd, ctx, mode).await,
        Commands::Installment(cmd) => handlers::installment::handle(cmd, ctx, mode).await,
        Commands::Thread(cmd) => handlers::thread::handle(cmd, ctx, mode).await,
        Commands::Character(cmd) => handlers::character::handle(cmd, ctx, mode).await,
        Commands::Persona(cmd) => handlers::persona::handle(cmd, ctx, mode).await,
        Commands::Appearance(cmd) => handlers::appearance::handle(cmd, ctx, mode).await,
        Commands::Credit(cmd) => handlers::credit::handle(cmd, ctx, mode).await,
        Commands::Completions { .. } => unreachable!("completions are handled before init"),
    }
}
