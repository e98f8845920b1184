//! Async shell around a `Page`.
//!
//! One loop owns the page. UI events come in over a channel; every network
//! effect they produce runs as a task in a `JoinSet` under the configured
//! timeout, and its completion is applied back in the same loop, so page
//! state is only ever touched from one place.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::{self, AbortHandle, JoinError, JoinSet};

use crate::api::{ApiError, MedicationApi};
use crate::page::{Completion, Page, UiEvent};
use crate::widget::Effect;

type RenderHook = Box<dyn FnMut(&Page)>;

/// What a running fetch task was issued for.
#[derive(Debug, Clone, Copy)]
enum InFlight {
    Suggestions(u64),
    Search(u64),
    Interactions(u64),
}

impl InFlight {
    /// The completion to apply when the task died without producing one.
    fn failed(self, error: ApiError) -> Completion {
        match self {
            Self::Suggestions(token) => Completion::Suggestions {
                token,
                result: Err(error),
            },
            Self::Search(token) => Completion::Search {
                token,
                result: Err(error),
            },
            Self::Interactions(token) => Completion::Interactions {
                token,
                result: Err(error),
            },
        }
    }
}

pub struct Driver<A: MedicationApi> {
    page: Page,
    api: A,
    timeout: Duration,
    tasks: JoinSet<Completion>,
    in_flight: HashMap<task::Id, InFlight>,
    /// Only the newest suggestion fetch is worth finishing.
    suggestion_task: Option<AbortHandle>,
    on_render: Option<RenderHook>,
}

impl<A: MedicationApi> Driver<A> {
    pub fn new(page: Page, api: A) -> Self {
        let timeout = page.widget().config().request_timeout;
        Self {
            page,
            api,
            timeout,
            tasks: JoinSet::new(),
            in_flight: HashMap::new(),
            suggestion_task: None,
            on_render: None,
        }
    }

    /// Called with the page after every state change.
    pub fn on_render(mut self, hook: impl FnMut(&Page) + 'static) -> Self {
        self.on_render = Some(Box::new(hook));
        self
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Number of fetches still in flight.
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Process events until the channel closes and every fetch has
    /// finished, then hand the page back.
    pub async fn run(mut self, mut events: mpsc::Receiver<UiEvent>) -> Page {
        tracing::info!(widget = %self.page.widget().id(), "Driver started");
        self.render();

        let mut accepting = true;
        loop {
            tokio::select! {
                event = events.recv(), if accepting => match event {
                    Some(event) => self.dispatch(event),
                    None => {
                        tracing::debug!(pending = self.tasks.len(), "Event channel closed");
                        accepting = false;
                    }
                },
                Some(joined) = self.tasks.join_next_with_id(), if !self.tasks.is_empty() => {
                    self.finish(joined);
                }
                else => break,
            }
        }

        tracing::info!(widget = %self.page.widget().id(), "Driver stopped");
        self.page
    }

    /// Handle one event synchronously and start whatever it asked for.
    pub fn dispatch(&mut self, event: UiEvent) {
        for effect in self.page.handle(event) {
            self.spawn(effect);
        }
        // Cleared input or a closed dropdown leaves nothing to wait for.
        if self.page.widget().fetcher().awaiting().is_none() {
            if let Some(task) = self.suggestion_task.take() {
                task.abort();
            }
        }
        self.render();
    }

    /// Wait for every in-flight fetch and apply it.
    pub async fn settle(&mut self) {
        while let Some(joined) = self.tasks.join_next_with_id().await {
            self.finish(joined);
        }
    }

    fn spawn(&mut self, effect: Effect) {
        let api = self.api.clone();
        let limit = self.timeout;

        match effect {
            Effect::FetchSuggestions(request) => {
                if let Some(previous) = self.suggestion_task.take() {
                    previous.abort();
                }
                let kind = InFlight::Suggestions(request.token);
                let handle = self.tasks.spawn(async move {
                    let result = with_timeout(limit, api.autocomplete(&request.query)).await;
                    Completion::Suggestions {
                        token: request.token,
                        result,
                    }
                });
                self.in_flight.insert(handle.id(), kind);
                self.suggestion_task = Some(handle);
            }
            Effect::Search(request) => {
                let kind = InFlight::Search(request.token);
                let handle = self.tasks.spawn(async move {
                    let result = with_timeout(limit, api.search(&request.query)).await;
                    Completion::Search {
                        token: request.token,
                        result,
                    }
                });
                self.in_flight.insert(handle.id(), kind);
            }
            Effect::CheckInteractions(request) => {
                let kind = InFlight::Interactions(request.token);
                let handle = self.tasks.spawn(async move {
                    let result =
                        with_timeout(limit, api.check_interactions(&request.drugs)).await;
                    Completion::Interactions {
                        token: request.token,
                        result,
                    }
                });
                self.in_flight.insert(handle.id(), kind);
            }
        }
    }

    fn finish(&mut self, joined: Result<(task::Id, Completion), JoinError>) {
        match joined {
            Ok((id, completion)) => {
                self.in_flight.remove(&id);
                self.page.apply(completion);
            }
            Err(e) if e.is_cancelled() => {
                self.in_flight.remove(&e.id());
                tracing::trace!("Superseded fetch cancelled");
                return;
            }
            Err(e) => {
                // Settle the request the task was serving so no state is
                // left waiting on it, then report the crash.
                if let Some(fetch) = self.in_flight.remove(&e.id()) {
                    self.page
                        .apply(fetch.failed(ApiError::TaskFailed(e.to_string())));
                }
                self.page.report_uncaught(&e);
            }
        }
        self.render();
    }

    fn render(&mut self) {
        if let Some(hook) = self.on_render.as_mut() {
            hook(&self.page);
        }
    }
}

async fn with_timeout<T>(
    limit: Duration,
    request: impl Future<Output = Result<T, ApiError>>,
) -> Result<T, ApiError> {
    match tokio::time::timeout(limit, request).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(timeout_ms = limit.as_millis() as u64, "Backend request timed out");
            Err(ApiError::Timeout(limit.as_millis() as u64))
        }
    }
}
