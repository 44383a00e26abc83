//! Line-oriented terminal front end.
//!
//! Talks to the store directly (no HTTP), prompting field by field when adding
//! or editing a bookmark. Input and output are generic so the loop can be
//! driven from tests.

pub mod draft;

use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::debug;

use crate::config::Config;
use crate::db::StorePool;
use crate::error::{AppError, AppResult};
use crate::models::bookmark::{self, Bookmark};
use crate::services::metadata;

pub use draft::{Draft, Field, FIELD_ORDER};

const HELP: &str = "a add | e [n] edit | d [n] delete | s <text> search | c clear search | \
                    r refresh | n/p next/prev | <n> select | h help | q quit";

#[derive(Debug)]
enum Mode {
    Normal,
    Add { step: usize, draft: Draft },
    Edit { step: usize, draft: Draft, id: String },
    ConfirmDelete { target: Bookmark },
}

pub struct Tui {
    store: StorePool,
    user_agent: String,
    metadata_timeout: Duration,
    data_label: String,
    bookmarks: Vec<Bookmark>,
    search: String,
    selected: usize,
    status: String,
    mode: Mode,
}

/// Run the terminal UI on stdin/stdout until the user quits.
pub async fn run(store: StorePool, config: &Config) -> AppResult<()> {
    let mut tui = Tui::new(store, config);
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    tui.run_with(stdin, &mut stdout).await
}

impl Tui {
    pub fn new(store: StorePool, config: &Config) -> Self {
        Tui {
            store,
            user_agent: config.user_agent.clone(),
            metadata_timeout: config.metadata_timeout,
            data_label: config.data_path.display().to_string(),
            bookmarks: Vec::new(),
            search: String::new(),
            selected: 0,
            status: "Ready.".to_string(),
            mode: Mode::Normal,
        }
    }

    pub async fn run_with<R, W>(&mut self, input: R, output: &mut W) -> AppResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        if let Err(e) = self.refresh().await {
            self.status = format!("Failed to load bookmarks: {}", e);
        }

        let mut lines = input.lines();
        loop {
            output.write_all(self.render().as_bytes()).await?;
            output.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            if !self.handle_line(&line).await? {
                break;
            }
        }

        output.write_all(b"Bye.\n").await?;
        output.flush().await?;
        Ok(())
    }

    fn filtered(&self) -> Vec<Bookmark> {
        bookmark::filter_bookmarks(self.bookmarks.clone(), &self.search)
    }

    fn selected_bookmark(&self) -> Option<Bookmark> {
        self.filtered().into_iter().nth(self.selected)
    }

    fn clamp_selection(&mut self) {
        let len = self.filtered().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    async fn refresh(&mut self) -> AppResult<()> {
        self.bookmarks = self.store.run(bookmark::list).await??;
        self.clamp_selection();
        Ok(())
    }

    fn render(&self) -> String {
        let mut out = String::new();

        match &self.mode {
            Mode::Normal => {
                let filtered = self.filtered();
                out.push_str(&format!("\n== Bookmarks ({}) == {}\n", filtered.len(), self.data_label));
                if !self.search.is_empty() {
                    out.push_str(&format!("Search: {}\n", self.search));
                }
                if filtered.is_empty() {
                    out.push_str("  No bookmarks yet.\n");
                }
                for (i, b) in filtered.iter().enumerate() {
                    let marker = if i == self.selected { '>' } else { ' ' };
                    out.push_str(&format!("{} {:>3}. {} ({})\n", marker, i + 1, b.title, b.url));
                    if i == self.selected && !b.tags.is_empty() {
                        out.push_str(&format!("        #{}\n", b.tags.join(" #")));
                    }
                }
                out.push_str(&format!("Status: {}\n", self.status));
                out.push_str("> ");
            }
            Mode::Add { step, draft } | Mode::Edit { step, draft, .. } => {
                if !self.status.is_empty() {
                    out.push_str(&format!("Status: {}\n", self.status));
                }
                let field = FIELD_ORDER[*step];
                let current = draft.get(field);
                if current.is_empty() {
                    out.push_str(&format!("Enter {}: ", field.label()));
                } else {
                    let hint = if field.is_required() {
                        "enter to keep"
                    } else {
                        "enter to keep, - to clear"
                    };
                    out.push_str(&format!("Enter {} [{}] ({}): ", field.label(), current, hint));
                }
            }
            Mode::ConfirmDelete { target } => {
                out.push_str(&format!("Type YES to delete {}: ", target.title));
            }
        }

        out
    }

    /// Returns `false` when the user asked to quit.
    async fn handle_line(&mut self, line: &str) -> AppResult<bool> {
        let mode = std::mem::replace(&mut self.mode, Mode::Normal);
        match mode {
            Mode::Normal => return self.handle_command(line.trim()).await,
            Mode::Add { step, draft } => self.handle_field(step, draft, None, line).await?,
            Mode::Edit { step, draft, id } => {
                self.handle_field(step, draft, Some(id), line).await?
            }
            Mode::ConfirmDelete { target } => self.handle_delete(target, line).await?,
        }
        Ok(true)
    }

    async fn handle_command(&mut self, input: &str) -> AppResult<bool> {
        let (command, arg) = match input.split_once(char::is_whitespace) {
            Some((c, rest)) => (c, rest.trim()),
            None => (input, ""),
        };

        match command {
            "" => {}
            "q" | "quit" => return Ok(false),
            "h" | "help" => self.status = HELP.to_string(),
            "a" | "add" => {
                self.mode = Mode::Add {
                    step: 0,
                    draft: Draft::default(),
                };
                self.status = "Adding a new bookmark.".to_string();
            }
            "e" | "edit" => {
                if let Some(target) = self.target_for(arg) {
                    self.mode = Mode::Edit {
                        step: 0,
                        draft: Draft::from_bookmark(&target),
                        id: target.id,
                    };
                    self.status = "Editing. Press Enter to keep existing values.".to_string();
                }
            }
            "d" | "delete" => {
                if let Some(target) = self.target_for(arg) {
                    self.status = format!("Type YES to delete {}.", target.title);
                    self.mode = Mode::ConfirmDelete { target };
                }
            }
            "s" | "search" | "/" => {
                self.search = arg.to_string();
                self.selected = 0;
                self.status = if self.search.is_empty() {
                    "Search cleared.".to_string()
                } else {
                    format!("Searching: {}", self.search)
                };
            }
            "c" | "clear" => {
                self.search.clear();
                self.selected = 0;
                self.status = "Search cleared.".to_string();
            }
            "r" | "refresh" => {
                self.refresh().await?;
                self.status = "Refreshed.".to_string();
            }
            "n" | "j" => {
                let len = self.filtered().len();
                if self.selected + 1 < len {
                    self.selected += 1;
                }
            }
            "p" | "k" => self.selected = self.selected.saturating_sub(1),
            other => match other.parse::<usize>() {
                Ok(n) => {
                    self.select(n);
                }
                Err(_) => self.status = format!("Unknown command: {}. Type h for help.", other),
            },
        }

        Ok(true)
    }

    /// Select the 1-based entry `n`. Returns whether it exists.
    fn select(&mut self, n: usize) -> bool {
        let len = self.filtered().len();
        if (1..=len).contains(&n) {
            self.selected = n - 1;
            true
        } else {
            self.status = format!("No bookmark numbered {}.", n);
            false
        }
    }

    fn target_for(&mut self, arg: &str) -> Option<Bookmark> {
        if !arg.is_empty() {
            match arg.parse::<usize>() {
                Ok(n) if self.select(n) => {}
                Ok(_) => return None,
                Err(_) => {
                    self.status = format!("Not a number: {}", arg);
                    return None;
                }
            }
        }

        let target = self.selected_bookmark();
        if target.is_none() {
            self.status = "Select a bookmark first.".to_string();
        }
        target
    }

    async fn handle_field(
        &mut self,
        step: usize,
        mut draft: Draft,
        editing: Option<String>,
        line: &str,
    ) -> AppResult<()> {
        let field = FIELD_ORDER[step];
        let value = line.trim();
        self.status.clear();

        match value {
            "" => {}
            "-" if !field.is_required() => draft.set(field, ""),
            "-" => self.status = "URL and title cannot be cleared.".to_string(),
            v => draft.set(field, v),
        }

        if editing.is_none() && field == Field::Url && !draft.url.is_empty() {
            self.prefill(&mut draft).await;
        }

        let next = step + 1;
        if next < FIELD_ORDER.len() {
            self.mode = match editing {
                Some(id) => Mode::Edit {
                    step: next,
                    draft,
                    id,
                },
                None => Mode::Add { step: next, draft },
            };
            return Ok(());
        }

        self.save(draft, editing).await
    }

    async fn prefill(&mut self, draft: &mut Draft) {
        let url = match metadata::normalize_target_url(&draft.url) {
            Ok(url) => url,
            Err(_) => {
                self.status = "No metadata found.".to_string();
                return;
            }
        };

        debug!("Fetching metadata for {}", url);
        let meta = metadata::fetch_metadata(&url, &self.user_agent, self.metadata_timeout).await;
        self.status = if draft.apply_metadata(&meta) {
            "Metadata loaded.".to_string()
        } else {
            "No metadata found.".to_string()
        };
    }

    async fn save(&mut self, draft: Draft, editing: Option<String>) -> AppResult<()> {
        let result = match editing {
            Some(id) => {
                let update = draft.into_update();
                self.store
                    .run(move |file| bookmark::update(file, &id, update))
                    .await?
                    .map(|_| "Bookmark updated.")
            }
            None => {
                if draft.url.trim().is_empty() || draft.title.trim().is_empty() {
                    self.status = "Title and URL are required.".to_string();
                    return Ok(());
                }
                let input = draft.into_new_bookmark();
                self.store
                    .run(move |file| bookmark::create(file, input))
                    .await?
                    .map(|_| "Bookmark added.")
            }
        };

        self.status = match result {
            Ok(message) => message.to_string(),
            Err(AppError::BookmarkNotFound) => "Bookmark not found. It may have been deleted.".to_string(),
            Err(e) if e.is_validation() => format!("Not saved: {}", e),
            Err(e) => return Err(e),
        };
        self.refresh().await
    }

    async fn handle_delete(&mut self, target: Bookmark, line: &str) -> AppResult<()> {
        if line.trim().to_uppercase() != "YES" {
            self.status = "Delete cancelled.".to_string();
            return Ok(());
        }

        let id = target.id.clone();
        let removed = self
            .store
            .run(move |file| bookmark::delete(file, &id))
            .await??;
        self.status = if removed {
            "Bookmark deleted.".to_string()
        } else {
            "Bookmark not found. It may have been deleted.".to_string()
        };
        self.refresh().await
    }
}
