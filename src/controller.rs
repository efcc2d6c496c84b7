//! The fetch/render/state-transition cycle.
//!
//! [`FetchCycle`] owns the only mutable state of the application: the busy flag
//! and the current [`CycleState`]. A refresh runs on the single-threaded event
//! loop and suspends only while the transport is awaiting the provider; a
//! second refresh triggered during that window finds the busy flag set and
//! returns without doing anything.
//!
//! # Cycle
//!
//! 1. Engage the busy flag (or drop the trigger if it is already engaged)
//! 2. Show the loading state
//! 3. Build the request; a missing credential fails here, before any I/O
//! 4. GET, check the status, parse the envelope
//! 5. Normalize and render, or clear the cards and show the error
//! 6. Release the busy flag and restore the idle affordance ([`CycleGuard`])
//! 7. Report the outcome on the status line

use std::cell::{Cell, RefCell};

use tracing::{debug, error, info, instrument, warn};

use crate::config::ApiConfig;
use crate::error::{CycleError, CycleResult};
use crate::models::{CycleState, DisplayArticle, HeadlinesResponse};
use crate::normalize::normalize_all;
use crate::render::View;
use crate::request;
use crate::status::{self, StatusReporter};
use crate::transport::HeadlineTransport;
use crate::utils::{looks_truncated, truncate_for_log};

/// Finalizes a cycle when dropped, on every exit path including unwinding.
struct CycleGuard<'a, V: View> {
    busy: &'a Cell<bool>,
    state: &'a RefCell<CycleState>,
    view: &'a V,
}

impl<'a, V: View> CycleGuard<'a, V> {
    /// Engage the busy flag, or return `None` if a cycle is already in flight.
    fn engage(busy: &'a Cell<bool>, state: &'a RefCell<CycleState>, view: &'a V) -> Option<Self> {
        if busy.replace(true) {
            return None;
        }
        Some(Self { busy, state, view })
    }
}

impl<V: View> Drop for CycleGuard<'_, V> {
    fn drop(&mut self) {
        // A cycle that never reached an outcome was aborted.
        if let Ok(mut state) = self.state.try_borrow_mut() {
            if state.is_loading() {
                *state = CycleState::Idle;
            }
        }
        self.busy.set(false);
        self.view.hide_loading();
    }
}

/// Refresh controller; one instance per session.
pub struct FetchCycle<T, V, S> {
    config: ApiConfig,
    transport: T,
    view: V,
    status: S,
    busy: Cell<bool>,
    state: RefCell<CycleState>,
}

impl<T, V, S> FetchCycle<T, V, S>
where
    T: HeadlineTransport,
    V: View,
    S: StatusReporter,
{
    pub fn new(config: ApiConfig, transport: T, view: V, status: S) -> Self {
        Self {
            config,
            transport,
            view,
            status,
            busy: Cell::new(false),
            state: RefCell::new(CycleState::Idle),
        }
    }

    /// True while a cycle is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> CycleState {
        self.state.borrow().clone()
    }

    /// The status line shared with connectivity reporting.
    pub fn status(&self) -> &S {
        &self.status
    }

    #[cfg(test)]
    fn view(&self) -> &V {
        &self.view
    }

    #[cfg(test)]
    fn transport(&self) -> &T {
        &self.transport
    }

    /// Run one refresh cycle.
    ///
    /// Callers observe the result through the view, the status line and
    /// [`FetchCycle::state`]. Calling this while a cycle is in flight is a no-op.
    #[instrument(level = "info", skip_all)]
    pub async fn refresh(&self) {
        let Some(guard) = CycleGuard::engage(&self.busy, &self.state, &self.view) else {
            debug!("Refresh already in flight; trigger dropped");
            return;
        };

        self.set_state(CycleState::Loading);
        self.view.show_loading();
        info!("Fetching news data");

        let message = match self.fetch().await {
            Ok(articles) => {
                info!(count = articles.len(), "Successfully fetched news articles");
                self.view.render(&articles);
                self.set_state(CycleState::Success(articles));
                status::last_updated_now()
            }
            Err(e) => {
                error!(kind = e.kind(), error = %e, "Error fetching news data");
                self.view.show_error();
                let message = e.user_message().to_string();
                self.set_state(CycleState::Failed(message.clone()));
                message
            }
        };

        drop(guard);
        self.status.report(&message);
    }

    async fn fetch(&self) -> CycleResult<Vec<DisplayArticle>> {
        let request = request::build(&self.config, None, None)?;
        debug!(
            endpoint = %request.endpoint,
            country = ?request.param("country"),
            category = ?request.param("category"),
            "Built provider request"
        );

        let response = self.transport.get(&request).await?;
        if !response.is_success() {
            warn!(
                status = response.status,
                body_preview = %truncate_for_log(&response.body, 300),
                "Provider returned an error status"
            );
            return Err(CycleError::HttpStatus(response.status));
        }

        let envelope: HeadlinesResponse = serde_json::from_str(&response.body).map_err(|e| {
            warn!(
                error = %e,
                truncated = looks_truncated(&e),
                body_preview = %truncate_for_log(&response.body, 300),
                "Provider body did not match the expected shape"
            );
            CycleError::from(e)
        })?;

        debug!(
            provider_status = ?envelope.status,
            total_results = ?envelope.total_results,
            page_len = envelope.articles.len(),
            "Parsed headlines envelope"
        );
        Ok(normalize_all(envelope.articles))
    }

    fn set_state(&self, next: CycleState) {
        *self.state.borrow_mut() = next;
    }
}
