//! # CLI Layer
//!
//! This module is **one possible UI client** for folio. It stands in for the
//! desktop form: a file argument is "dropped" into a session, flags fill the
//! draft, and the add command saves it.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Installs a tracing subscriber
//! - Handles argument parsing

mod print;
mod setup;

use clap::Parser;
use folio::api::{open_site, FolioApi};
use folio::error::Result;
use folio::model::{AnimeDraft, ChessDraft, PhotoDraft};
use folio::session::Session;
use folio::store::fs_backend::FsBackend;
use print::{print_messages, print_records};
use setup::{AddCommands, Cli, Commands};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_ENV: &str = "FOLIO_LOG";

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };
    let api = open_site(&root)?;

    match cli.command {
        Commands::Init => handle_init(&api),
        Commands::Add(add) => handle_add(&api, add),
        Commands::List { kind } => handle_list(&api, kind.into()),
        Commands::Doctor => handle_doctor(&api),
    }
}

/// Logs go to stderr so stdout stays clean for listings.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

fn handle_init(api: &FolioApi<FsBackend>) -> Result<()> {
    let result = api.init()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_add(api: &FolioApi<FsBackend>, add: AddCommands) -> Result<()> {
    let mut session = Session::new();

    let result = match add {
        AddCommands::Photo {
            file,
            title,
            location,
            description,
        } => {
            stage(api, &mut session, &file)?;
            let title = match title {
                Some(title) => title,
                None => api.suggested_title(&session).unwrap_or_default(),
            };
            let draft = PhotoDraft {
                title,
                location,
                description,
            };
            api.add_photo(&mut session, draft)?
        }
        AddCommands::Chess {
            title,
            content,
            image,
        } => {
            if let Some(image) = image {
                stage(api, &mut session, &image)?;
            }
            api.add_chess_post(&mut session, ChessDraft { title, content })?
        }
        AddCommands::Anime {
            file,
            title,
            kind,
            rating,
            description,
        } => {
            stage(api, &mut session, &file)?;
            let draft = AnimeDraft {
                title,
                kind: kind.into(),
                rating,
                description,
            };
            api.add_anime_entry(&mut session, draft)?
        }
    };

    print_records(&result.affected);
    print_messages(&result.messages);
    Ok(())
}

/// A file argument may be a plain path or a pasted drop payload
/// (`{/path/with spaces.jpg}`).
fn stage(api: &FolioApi<FsBackend>, session: &mut Session, arg: &str) -> Result<()> {
    let result = if arg.trim_start().starts_with('{') {
        api.stage_drop(session, arg)?
    } else {
        api.stage(session, arg)?
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(api: &FolioApi<FsBackend>, kind: folio::model::ContentKind) -> Result<()> {
    let result = api.list(kind)?;
    print_records(&result.listed);
    print_messages(&result.messages);
    Ok(())
}

fn handle_doctor(api: &FolioApi<FsBackend>) -> Result<()> {
    let result = api.doctor()?;
    print_messages(&result.messages);
    Ok(())
}
