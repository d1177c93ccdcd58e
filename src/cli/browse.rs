// src/cli/browse.rs
//
// Interactive session. Input lines, settled search terms and finished
// requests all arrive in one loop that owns the view state; requests run as
// spawned tasks and report back over a channel.
use crate::application::{
    FetchOutcome, MutationOutcome, NoteGateway, NoteLister, NoteMutator, QueryCache,
};
use crate::domain::{DeletedNote, DomainError, Note};
use crate::ports::{ModalHost, NoteForm, PaginationControl, SearchBox, TerminalPresenter};
use anyhow::{Context, Result};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, instrument};

pub const SCREEN_HEADER: &str = "══ notehub ══";

const HELP: &str = "\
Type to search. Commands:
  :n / :p      next / previous page
  :g N         go to page N
  :r           refresh
  :d ID        delete note
  :new         create note (then :submit, :cancel, :title, :content, :tag)
  :q           quit
";

enum Event {
    Fetched(FetchOutcome),
    Created(Result<MutationOutcome<Note>, DomainError>),
    Deleted {
        id: String,
        result: Result<DeletedNote, DomainError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormField {
    Title,
    Content,
    Tag,
    Review,
}

impl FormField {
    fn prompt(&self) -> &'static str {
        match self {
            FormField::Title => "Title (3-50 characters):",
            FormField::Content => "Content (optional, up to 500 characters):",
            FormField::Tag => "Tag (Todo, Work, Personal, Meeting, Shopping; empty keeps Todo):",
            FormField::Review => ":submit to create, :cancel to discard",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

struct BrowseSession<G: NoteGateway + 'static, W: Write> {
    lister: NoteLister<G>,
    mutator: Arc<NoteMutator<G>>,
    cache: QueryCache,
    presenter: TerminalPresenter,
    search: Option<SearchBox>,
    modal: ModalHost<NoteForm>,
    field: FormField,
    events_tx: mpsc::UnboundedSender<Event>,
    pending: usize,
    dirty: bool,
    out: W,
}

impl<G: NoteGateway + 'static, W: Write> BrowseSession<G, W> {
    fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "{message}").context("Failed to write output")
    }

    fn render(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        self.dirty = false;

        let busy = self.mutator.deleting_ids();
        let mut screen = format!("{SCREEN_HEADER} page {}\n", self.lister.current_page());
        let search = self.search.as_ref().map_or(self.lister.search(), |s| s.value());
        screen.push_str(&format!("Search: {search}\n"));
        screen.push_str(&self.presenter.render_state(
            &self.lister.state(),
            self.lister.current_page(),
            &busy,
        ));
        if let Some(form) = self.modal.content() {
            screen.push_str(&self.presenter.render_form(form));
            screen.push_str(self.field.prompt());
            screen.push('\n');
        }
        write!(self.out, "{screen}").context("Failed to write output")
    }

    /// Start a list request if the current key needs one
    fn sync(&mut self) {
        if let Some(ticket) = self.lister.issue() {
            let gateway = self.lister.gateway();
            let tx = self.events_tx.clone();
            self.pending += 1;
            self.dirty = true;
            tokio::spawn(async move {
                let outcome = NoteLister::fetch(gateway, ticket).await;
                let _ = tx.send(Event::Fetched(outcome));
            });
        }
    }

    fn close_search(&mut self) {
        // dropping the box flushes the debouncer and closes its output
        self.search = None;
    }

    fn on_settled(&mut self, term: &str) {
        if self.lister.set_search(term) {
            self.dirty = true;
        }
    }

    #[instrument(level = "debug", skip(self))]
    fn handle_line(&mut self, line: &str) -> Result<Flow> {
        if self.modal.is_open() {
            return self.handle_form_line(line);
        }

        let trimmed = line.trim();
        if !trimmed.starts_with(':') {
            if let Some(search) = self.search.as_mut() {
                search.input(line);
                self.dirty = true;
            }
            return Ok(Flow::Continue);
        }

        let (command, arg) = match trimmed.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (trimmed, ""),
        };
        match command {
            ":q" => return Ok(Flow::Quit),
            ":h" => self.say(HELP)?,
            ":n" => self.dirty |= self.lister.next_page(),
            ":p" => self.dirty |= self.lister.previous_page(),
            ":g" => match arg.parse::<u32>() {
                Ok(page) => {
                    let page = self
                        .lister
                        .total_pages()
                        .and_then(|total| PaginationControl::new(total, self.lister.current_page()))
                        .map_or(page, |control| control.request(page));
                    self.dirty |= self.lister.set_page(page);
                }
                Err(_) => self.say("Usage: :g PAGE")?,
            },
            ":r" => {
                self.cache.invalidate_all();
                self.dirty = true;
            }
            ":d" if !arg.is_empty() => self.start_delete(arg)?,
            ":d" => self.say("Usage: :d NOTE_ID")?,
            ":new" => {
                self.modal.open(NoteForm::new());
                self.field = FormField::Title;
                self.dirty = true;
            }
            other => self.say(&format!("Unknown command {other}, :h for help"))?,
        }
        Ok(Flow::Continue)
    }

    fn handle_form_line(&mut self, line: &str) -> Result<Flow> {
        let trimmed = line.trim();
        match trimmed {
            ":q" => return Ok(Flow::Quit),
            ":cancel" => {
                self.modal.close();
                self.say("Cancelled")?;
            }
            ":submit" => self.submit_form()?,
            ":title" => self.field = FormField::Title,
            ":content" => self.field = FormField::Content,
            ":tag" => self.field = FormField::Tag,
            _ => {
                let field = self.field;
                let Some(form) = self.modal.content_mut() else {
                    return Ok(Flow::Continue);
                };
                match field {
                    FormField::Title => {
                        form.set_title(line);
                        self.field = FormField::Content;
                    }
                    FormField::Content => {
                        form.set_content(line);
                        self.field = FormField::Tag;
                    }
                    FormField::Tag => {
                        if !trimmed.is_empty() {
                            form.set_tag(trimmed);
                        }
                        self.field = FormField::Review;
                        self.submit_form()?;
                    }
                    FormField::Review => self.say(FormField::Review.prompt())?,
                }
            }
        }
        self.dirty = true;
        Ok(Flow::Continue)
    }

    fn submit_form(&mut self) -> Result<()> {
        let Some(form) = self.modal.content_mut() else {
            return Ok(());
        };
        if form.is_submitting() {
            return Ok(());
        }
        match form.submit() {
            Ok(payload) => {
                form.set_submitting(true);
                let mutator = Arc::clone(&self.mutator);
                let tx = self.events_tx.clone();
                self.pending += 1;
                tokio::spawn(async move {
                    let result = mutator.create(&payload).await;
                    let _ = tx.send(Event::Created(result));
                });
            }
            Err(errors) => {
                self.field = if errors.title.is_some() {
                    FormField::Title
                } else if errors.content.is_some() {
                    FormField::Content
                } else {
                    FormField::Tag
                };
                let rendered = self.presenter.render_errors(&errors);
                self.say(&format!("Please fix:\n{}", rendered.trim_end()))?;
            }
        }
        self.dirty = true;
        Ok(())
    }

    fn start_delete(&mut self, id: &str) -> Result<()> {
        // reserved here so the next render already shows the row busy
        let Some(reservation) = self.mutator.reserve_delete(id) else {
            return self.say(&format!("Already deleting {id}"));
        };
        let mutator = Arc::clone(&self.mutator);
        let tx = self.events_tx.clone();
        let id = id.to_string();
        self.pending += 1;
        self.dirty = true;
        self.say(&format!("Deleting {id}…"))?;
        tokio::spawn(async move {
            let result = mutator.delete_reserved(reservation).await;
            let _ = tx.send(Event::Deleted { id, result });
        });
        Ok(())
    }

    fn on_event(&mut self, event: Event) -> Result<()> {
        self.pending = self.pending.saturating_sub(1);
        match event {
            Event::Fetched(outcome) => {
                debug!(key = ?outcome.key(), "List request finished");
                self.dirty |= self.lister.apply(outcome);
            }
            Event::Created(result) => {
                if let Some(form) = self.modal.content_mut() {
                    form.set_submitting(false);
                }
                match result {
                    Ok(MutationOutcome::Done(note)) => {
                        self.modal.close();
                        self.say(&format!("Created note {}", note.id))?;
                    }
                    Ok(MutationOutcome::Ignored) => {}
                    Err(e) => {
                        self.field = FormField::Review;
                        self.say(&format!("Error: {e}"))?;
                    }
                }
                self.dirty = true;
            }
            Event::Deleted { id, result } => {
                match result {
                    Ok(deleted) => {
                        self.say(&format!("Deleted note {} ({id})", deleted.note.title))?;
                    }
                    Err(e) => self.say(&format!("Error: {e}"))?,
                }
                self.dirty = true;
            }
        }
        Ok(())
    }
}

/// Run an interactive session until `:q` or until input ends and all
/// outstanding requests have come back.
pub async fn browse<G, R, W>(
    gateway: Arc<G>,
    cache: QueryCache,
    search_debounce: Duration,
    input: R,
    out: W,
) -> Result<()>
where
    G: NoteGateway + 'static,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let (search_box, mut settled_rx) = SearchBox::spawn(search_debounce);
    let mut session = BrowseSession {
        lister: NoteLister::new(Arc::clone(&gateway), cache.clone()),
        mutator: Arc::new(NoteMutator::new(gateway, cache.clone())),
        cache,
        presenter: TerminalPresenter::new(),
        search: Some(search_box),
        modal: ModalHost::new(),
        field: FormField::Title,
        events_tx,
        pending: 0,
        dirty: true,
        out,
    };

    let mut lines = input.lines();
    let mut input_open = true;
    let mut settled_open = true;

    session.say("Type to search, :h for help")?;
    session.sync();
    session.render()?;

    loop {
        if !input_open && !settled_open && session.pending == 0 {
            break;
        }
        tokio::select! {
            line = lines.next_line(), if input_open => {
                match line.context("Failed to read input")? {
                    Some(line) => {
                        if session.handle_line(&line)? == Flow::Quit {
                            break;
                        }
                    }
                    None => {
                        input_open = false;
                        session.close_search();
                    }
                }
            }
            settled = settled_rx.recv(), if settled_open => {
                match settled {
                    Some(term) => session.on_settled(&term),
                    None => settled_open = false,
                }
            }
            Some(event) = events_rx.recv(), if session.pending > 0 => {
                session.on_event(event)?;
            }
            else => break,
        }
        session.sync();
        session.render()?;
    }

    session.out.flush().context("Failed to flush output")?;
    Ok(())
}
