//! Event loop driving a [`Directory`] against a repository.
//!
//! The loop owns the state and is the only writer. Callers talk to it
//! through a cloneable [`DirectoryHandle`] and observe it through a `watch`
//! channel of [`DirectorySnapshot`]s. Network calls run in their own tasks so
//! input keeps flowing while they are pending.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, error};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use crate::directory::debounce::Debouncer;
use crate::directory::{Directory, DirectoryEvent, FetchTicket, QueryState, ResultState};
use crate::domain::member::{Member, MemberPage, NewMember};
use crate::domain::types::{Category, RecordKey};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{MemberReader, MemberWriter};

#[derive(Clone, Debug)]
pub struct DirectoryOptions {
    /// How long the search text must stay unchanged before it is sent.
    pub search_debounce: Duration,
    pub command_buffer: usize,
}

impl Default for DirectoryOptions {
    fn default() -> Self {
        Self {
            search_debounce: Duration::from_millis(500),
            command_buffer: 32,
        }
    }
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("directory loop has stopped")]
    Closed,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// State published after every change.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DirectorySnapshot {
    pub query: QueryState,
    /// Search text typed but not yet settled.
    pub pending_search: Option<String>,
    pub result: ResultState,
}

enum Command {
    EditSearch(String),
    SelectCategory(Option<Category>),
    GoToPage(usize),
    NextPage,
    PreviousPage,
    Refresh,
    Create {
        member: NewMember,
        reply: oneshot::Sender<RepositoryResult<Member>>,
    },
    Update {
        key: RecordKey,
        member: NewMember,
        reply: oneshot::Sender<RepositoryResult<Member>>,
    },
}

enum Completion {
    Loaded {
        seq: u64,
        outcome: RepositoryResult<MemberPage>,
    },
    Mutated,
}

#[derive(Clone, Debug)]
pub struct DirectoryHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<DirectorySnapshot>,
}

impl DirectoryHandle {
    async fn send(&self, command: Command) -> Result<(), DirectoryError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| DirectoryError::Closed)
    }

    /// Records a keystroke; the fetch waits for the debounce delay.
    pub async fn edit_search(&self, text: impl Into<String>) -> Result<(), DirectoryError> {
        self.send(Command::EditSearch(text.into())).await
    }

    pub async fn select_category(&self, category: Option<Category>) -> Result<(), DirectoryError> {
        self.send(Command::SelectCategory(category)).await
    }

    pub async fn go_to_page(&self, page: usize) -> Result<(), DirectoryError> {
        self.send(Command::GoToPage(page)).await
    }

    pub async fn next_page(&self) -> Result<(), DirectoryError> {
        self.send(Command::NextPage).await
    }

    pub async fn previous_page(&self) -> Result<(), DirectoryError> {
        self.send(Command::PreviousPage).await
    }

    pub async fn refresh(&self) -> Result<(), DirectoryError> {
        self.send(Command::Refresh).await
    }

    /// Creates a member; on success a refresh is already queued when this
    /// returns.
    pub async fn create_member(&self, member: NewMember) -> Result<Member, DirectoryError> {
        let (reply, outcome) = oneshot::channel();
        self.send(Command::Create { member, reply }).await?;
        Ok(outcome.await.map_err(|_| DirectoryError::Closed)??)
    }

    pub async fn update_member(
        &self,
        key: RecordKey,
        member: NewMember,
    ) -> Result<Member, DirectoryError> {
        let (reply, outcome) = oneshot::channel();
        self.send(Command::Update { key, member, reply }).await?;
        Ok(outcome.await.map_err(|_| DirectoryError::Closed)??)
    }

    pub fn snapshot(&self) -> DirectorySnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DirectorySnapshot> {
        self.snapshots.clone()
    }
}

/// Starts the directory loop on the current tokio runtime.
///
/// The first page is requested immediately. The loop stops once every
/// handle has been dropped.
pub fn spawn<R>(repo: Arc<R>, options: DirectoryOptions) -> DirectoryHandle
where
    R: MemberReader + MemberWriter + Send + Sync + 'static,
{
    let (commands_tx, commands_rx) = mpsc::channel(options.command_buffer.max(1));
    let (completions_tx, completions_rx) = mpsc::unbounded_channel();
    let directory = Directory::new();
    let (snapshots_tx, snapshots_rx) = watch::channel(DirectorySnapshot {
        query: directory.query().clone(),
        pending_search: None,
        result: directory.result().clone(),
    });

    let mut worker = Worker {
        repo,
        directory,
        debouncer: Debouncer::new(options.search_debounce),
        commands: commands_rx,
        completions: completions_rx,
        completions_tx,
        snapshots: snapshots_tx,
        in_flight: None,
    };
    worker.dispatch(DirectoryEvent::Refresh);
    tokio::spawn(worker.run());

    DirectoryHandle {
        commands: commands_tx,
        snapshots: snapshots_rx,
    }
}

struct Worker<R> {
    repo: Arc<R>,
    directory: Directory,
    debouncer: Debouncer<String>,
    commands: mpsc::Receiver<Command>,
    completions: mpsc::UnboundedReceiver<Completion>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    snapshots: watch::Sender<DirectorySnapshot>,
    in_flight: Option<JoinHandle<()>>,
}

impl<R> Worker<R>
where
    R: MemberReader + MemberWriter + Send + Sync + 'static,
{
    async fn run(mut self) {
        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },
                Some(completion) = self.completions.recv() => self.complete(completion),
                search = self.debouncer.settled(), if self.debouncer.is_pending() => {
                    self.dispatch(DirectoryEvent::SearchSettled(search));
                }
            }
        }

        if let Some(task) = self.in_flight.take() {
            task.abort();
        }
        debug!("Directory loop stopped");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::EditSearch(text) => {
                self.debouncer.push(text);
                self.publish();
            }
            Command::SelectCategory(category) => {
                self.dispatch(DirectoryEvent::CategorySelected(category))
            }
            Command::GoToPage(page) => self.dispatch(DirectoryEvent::PageRequested(page)),
            Command::NextPage => self.dispatch(DirectoryEvent::NextPage),
            Command::PreviousPage => self.dispatch(DirectoryEvent::PreviousPage),
            Command::Refresh => self.dispatch(DirectoryEvent::Refresh),
            Command::Create { member, reply } => {
                let repo = Arc::clone(&self.repo);
                self.spawn_mutation(reply, async move { repo.create_member(&member).await });
            }
            Command::Update { key, member, reply } => {
                let repo = Arc::clone(&self.repo);
                self.spawn_mutation(reply, async move {
                    repo.update_member(&key, &member).await
                });
            }
        }
    }

    fn complete(&mut self, completion: Completion) {
        match completion {
            Completion::Loaded { seq, outcome } => {
                self.dispatch(DirectoryEvent::PageLoaded { seq, outcome })
            }
            Completion::Mutated => self.dispatch(DirectoryEvent::Refresh),
        }
    }

    fn dispatch(&mut self, event: DirectoryEvent) {
        if let Some(ticket) = self.directory.update(event) {
            self.start_fetch(ticket);
        }
        self.publish();
    }

    /// Runs the fetch for `ticket`, aborting whichever one it supersedes.
    fn start_fetch(&mut self, ticket: FetchTicket) {
        if let Some(previous) = self.in_flight.take() {
            previous.abort();
        }

        debug!("Fetching members #{}: {:?}", ticket.seq, ticket.query);
        let repo = Arc::clone(&self.repo);
        let completions = self.completions_tx.clone();
        self.in_flight = Some(tokio::spawn(async move {
            let outcome = repo.list_members(&ticket.query.to_list_query()).await;
            let _ = completions.send(Completion::Loaded {
                seq: ticket.seq,
                outcome,
            });
        }));
    }

    fn spawn_mutation<F>(&self, reply: oneshot::Sender<RepositoryResult<Member>>, mutation: F)
    where
        F: Future<Output = RepositoryResult<Member>> + Send + 'static,
    {
        let completions = self.completions_tx.clone();
        tokio::spawn(async move {
            let outcome = mutation.await;
            match &outcome {
                Ok(_) => {
                    let _ = completions.send(Completion::Mutated);
                }
                Err(err) => error!("Failed to process member: {err}"),
            }
            let _ = reply.send(outcome);
        });
    }

    fn publish(&self) {
        self.snapshots.send_replace(DirectorySnapshot {
            query: self.directory.query().clone(),
            pending_search: self.debouncer.pending().cloned(),
            result: self.directory.result().clone(),
        });
    }
}
