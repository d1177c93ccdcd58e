// src/lib.rs
pub mod application;
pub mod cli;
pub mod constants;
pub mod domain;
pub mod infrastructure;
pub mod ports;
pub mod util;

use anyhow::{Context, Result};
use application::{ListState, MutationOutcome, NoteLister, NoteMutator, QueryCache};
use domain::DomainError;
use infrastructure::{AppConfig, HttpNoteGateway};
use ports::{NoteForm, TerminalPresenter};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};
use crate::cli::args::{Args, Command};

pub async fn run(args: Args) -> Result<()> {
    debug!(?args, "Starting notehub with arguments");

    // Configuration problems are fatal and reported before any request
    let config = AppConfig::load(args.config.as_deref())?;
    let gateway = Arc::new(HttpNoteGateway::new(&config)?);
    let cache = QueryCache::new(config.stale_time);
    let presenter = TerminalPresenter::new();

    match args.command {
        Command::List { page, search, json } => {
            info!(page, ?search, "Listing notes");
            let mut lister = NoteLister::new(gateway, cache);
            lister.set_search(search.as_deref().unwrap_or(""));
            lister.set_page(page);

            match lister.refresh().await {
                ListState::Error { message } => {
                    return Err(
                        anyhow::Error::new(DomainError::Network(message))
                            .context("Failed to list notes"),
                    );
                }
                ListState::Ready { page: notes, .. } if json => {
                    println!("{}", presenter.to_json(&notes)?);
                }
                state => {
                    print!(
                        "{}",
                        presenter.render_state(&state, lister.current_page(), &HashSet::new())
                    );
                }
            }
        }
        Command::Create {
            title,
            content,
            tag,
            json,
        } => {
            let mut form = NoteForm::new();
            form.set_title(&title);
            form.set_content(&content);
            form.set_tag(&tag);
            let payload = match form.submit() {
                Ok(payload) => payload,
                Err(errors) => {
                    eprint!("{}", presenter.render_errors(&errors));
                    return Err(DomainError::Validation(errors).into());
                }
            };

            info!(title = %payload.title, "Creating note");
            let mutator = NoteMutator::new(gateway, cache);
            if let MutationOutcome::Done(note) = mutator
                .create(&payload)
                .await
                .context("Failed to create note")?
            {
                if json {
                    println!("{}", presenter.to_json(&note)?);
                } else {
                    print!("{}", presenter.render_note(&note));
                }
            }
        }
        Command::Delete { note_id, json } => {
            info!(%note_id, "Deleting note");
            let mutator = NoteMutator::new(gateway, cache);
            if let MutationOutcome::Done(deleted) = mutator
                .delete(&note_id)
                .await
                .with_context(|| format!("Failed to delete note {note_id}"))?
            {
                if json {
                    println!("{}", presenter.to_json(&deleted)?);
                } else {
                    println!("Deleted note {} ({})", deleted.note.title, deleted.note.id);
                }
            }
        }
        Command::Browse => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            cli::browse::browse(
                gateway,
                cache,
                config.search_debounce,
                stdin,
                std::io::stdout(),
            )
            .await?;
        }
    }

    Ok(())
}
