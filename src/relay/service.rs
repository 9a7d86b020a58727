use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::catalog::MessageCatalog;
use crate::event::{EventDescriptor, WebhookEvent};
use crate::metrics::{EventMetrics, RelayMetrics};
use crate::notification::{ChatDispatcher, DispatchReport};
use crate::portal::{GlobalSettings, ListenerRegistration, PortalApi, TemplateSet};

use super::view_model::build_view_model;
use super::{InterestTable, RelayError, RelayResult, RelayState};

/// Settings and interest table in effect. Replaced as a whole on reload,
/// never mutated in place.
#[derive(Debug, Clone)]
pub struct RelaySnapshot {
    pub interest: InterestTable,
    pub globals: GlobalSettings,
    pub loaded_at: DateTime<Utc>,
}

/// Why an event produced no chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The relay has no settings snapshot (not initialized or unregistered)
    NotReady,
    /// No enabled template for the event kind
    NotInteresting,
    /// The event carries no acting user
    MissingUser,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::NotReady => "not_ready",
            SkipReason::NotInteresting => "not_interesting",
            SkipReason::MissingUser => "missing_user",
        }
    }
}

/// Result of handling one event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum HandleOutcome {
    Skipped { reason: SkipReason },
    Dispatched { report: DispatchReport },
}

/// Counters for a processed webhook batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub received: usize,
    pub dispatched: usize,
    pub skipped: usize,
    pub failed: usize,
    pub acknowledged: usize,
}

/// Statistics for the relay
#[derive(Debug, Default)]
pub struct RelayStats {
    pub events_received: AtomicU64,
    pub events_dispatched: AtomicU64,
    pub events_skipped: AtomicU64,
    pub events_failed: AtomicU64,
    pub acknowledge_failures: AtomicU64,
    pub reloads: AtomicU64,
}

impl RelayStats {
    pub fn snapshot(&self) -> RelayStatsSnapshot {
        RelayStatsSnapshot {
            events_received: self.events_received.load(Ordering::Relaxed),
            events_dispatched: self.events_dispatched.load(Ordering::Relaxed),
            events_skipped: self.events_skipped.load(Ordering::Relaxed),
            events_failed: self.events_failed.load(Ordering::Relaxed),
            acknowledge_failures: self.acknowledge_failures.load(Ordering::Relaxed),
            reloads: self.reloads.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of relay statistics
#[derive(Debug, Clone, Serialize)]
pub struct RelayStatsSnapshot {
    pub events_received: u64,
    pub events_dispatched: u64,
    pub events_skipped: u64,
    pub events_failed: u64,
    pub acknowledge_failures: u64,
    pub reloads: u64,
}

/// Bridges portal lifecycle events to chat webhooks.
pub struct ChatbotRelay {
    portal: Arc<dyn PortalApi>,
    dispatcher: Arc<ChatDispatcher>,
    catalog: MessageCatalog,
    listener: ListenerRegistration,
    state: RwLock<RelayState>,
    snapshot: RwLock<Option<Arc<RelaySnapshot>>>,
    stats: RelayStats,
}

impl ChatbotRelay {
    pub fn new(
        portal: Arc<dyn PortalApi>,
        dispatcher: Arc<ChatDispatcher>,
        catalog: MessageCatalog,
        listener: ListenerRegistration,
    ) -> Self {
        Self {
            portal,
            dispatcher,
            catalog,
            listener,
            state: RwLock::new(RelayState::Uninitialized),
            snapshot: RwLock::new(None),
            stats: RelayStats::default(),
        }
    }

    pub fn state(&self) -> RelayState {
        match self.state.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    pub fn listener(&self) -> &ListenerRegistration {
        &self.listener
    }

    pub fn dispatcher(&self) -> &ChatDispatcher {
        &self.dispatcher
    }

    pub fn stats(&self) -> RelayStatsSnapshot {
        self.stats.snapshot()
    }

    /// The snapshot in effect, if the relay is ready.
    pub fn snapshot(&self) -> Option<Arc<RelaySnapshot>> {
        match self.snapshot.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn set_state(&self, state: RelayState) {
        let mut guard = match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        tracing::debug!(from = %*guard, to = %state, "Relay state transition");
        *guard = state;
        RelayMetrics::set_ready(state == RelayState::Ready);
    }

    fn replace_snapshot(&self, snapshot: Option<RelaySnapshot>) {
        let size = snapshot.as_ref().map(|s| s.interest.len()).unwrap_or(0);
        let mut guard = match self.snapshot.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = snapshot.map(Arc::new);
        RelayMetrics::set_interest_table_size(size);
    }

    fn build_snapshot(
        &self,
        globals: GlobalSettings,
        templates: &TemplateSet,
    ) -> RelayResult<RelaySnapshot> {
        let interest = InterestTable::build(&globals, templates, &self.catalog)?;
        Ok(RelaySnapshot {
            interest,
            globals,
            loaded_at: Utc::now(),
        })
    }

    /// Register with the listener registry and load settings and templates.
    ///
    /// The three portal calls run concurrently; the first failure aborts
    /// startup and leaves the relay in [`RelayState::Failed`].
    #[tracing::instrument(name = "relay.init", skip(self), fields(listener_id = %self.listener.id))]
    pub async fn init(&self) -> RelayResult<()> {
        self.set_state(RelayState::Registering);

        match self.register_and_load().await {
            Ok(snapshot) => {
                tracing::info!(
                    interesting_events = snapshot.interest.len(),
                    destinations = snapshot.globals.hook_urls().len(),
                    "Chatbot relay initialized"
                );
                self.replace_snapshot(Some(snapshot));
                self.set_state(RelayState::Ready);
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Chatbot relay initialization failed");
                self.replace_snapshot(None);
                self.set_state(RelayState::Failed);
                Err(e)
            }
        }
    }

    async fn register_and_load(&self) -> RelayResult<RelaySnapshot> {
        tracing::debug!(url = %self.listener.url, "Registering as listener");
        let (_, globals, templates) = tokio::try_join!(
            self.portal.register_listener(&self.listener),
            self.portal.get_globals(),
            self.portal.get_templates(),
        )?;
        self.build_snapshot(globals, &templates)
    }

    /// Re-fetch settings and templates and swap the snapshot atomically.
    ///
    /// On failure the previous snapshot stays in effect.
    #[tracing::instrument(name = "relay.reload", skip(self))]
    pub async fn reload(&self) -> RelayResult<usize> {
        let state = self.state();
        if state != RelayState::Ready {
            return Err(RelayError::NotReady(state));
        }

        let (globals, templates) =
            tokio::try_join!(self.portal.get_globals(), self.portal.get_templates())?;
        let snapshot = self.build_snapshot(globals, &templates)?;
        let size = snapshot.interest.len();

        self.replace_snapshot(Some(snapshot));
        self.stats.reloads.fetch_add(1, Ordering::Relaxed);
        tracing::info!(interesting_events = size, "Chatbot settings reloaded");
        Ok(size)
    }

    /// Best-effort de-registration. The relay stops handling events even if
    /// the portal call fails; the error is returned for logging.
    #[tracing::instrument(name = "relay.deinit", skip(self), fields(listener_id = %self.listener.id))]
    pub async fn deinit(&self) -> RelayResult<()> {
        let result = self.portal.unregister_listener(&self.listener.id).await;
        self.replace_snapshot(None);
        self.set_state(RelayState::Unregistered);

        match result {
            Ok(()) => {
                tracing::info!("Unregistered from listener registry");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "De-registration failed");
                Err(e.into())
            }
        }
    }

    /// Whether an enabled template exists for the event's `entity.action`.
    pub fn is_event_interesting(&self, event: &EventDescriptor) -> bool {
        self.snapshot()
            .map(|snapshot| snapshot.interest.contains(event))
            .unwrap_or(false)
    }

    /// Render and post the message for one event.
    ///
    /// Delivery failures never surface here; only a failed profile lookup
    /// is returned as an error.
    #[tracing::instrument(name = "relay.handle_event", skip(self, event), fields(event = %event.key()))]
    pub async fn handle_event(&self, event: &EventDescriptor) -> RelayResult<HandleOutcome> {
        let started = Instant::now();
        let result = self.render_and_dispatch(event).await;

        match &result {
            Ok(HandleOutcome::Dispatched { report }) => {
                self.stats.events_dispatched.fetch_add(1, Ordering::Relaxed);
                EventMetrics::record_outcome("dispatched");
                EventMetrics::record_handling_time(started.elapsed().as_secs_f64());
                tracing::debug!(
                    delivered = report.delivered,
                    failed = report.failed,
                    "Event relayed"
                );
            }
            Ok(HandleOutcome::Skipped { reason }) => {
                self.stats.events_skipped.fetch_add(1, Ordering::Relaxed);
                EventMetrics::record_outcome(reason.as_str());
                tracing::debug!(reason = reason.as_str(), "Event skipped");
            }
            Err(e) => {
                self.stats.events_failed.fetch_add(1, Ordering::Relaxed);
                EventMetrics::record_outcome("failed");
                tracing::error!(error = %e, "Event handling failed");
            }
        }

        result
    }

    async fn render_and_dispatch(&self, event: &EventDescriptor) -> RelayResult<HandleOutcome> {
        let Some(snapshot) = self.snapshot() else {
            return Ok(HandleOutcome::Skipped {
                reason: SkipReason::NotReady,
            });
        };
        let Some(template) = snapshot.interest.get(&event.key()) else {
            return Ok(HandleOutcome::Skipped {
                reason: SkipReason::NotInteresting,
            });
        };

        let portal_url = snapshot.globals.portal_url();
        let Some(view_model) = build_view_model(self.portal.as_ref(), event, &portal_url).await?
        else {
            return Ok(HandleOutcome::Skipped {
                reason: SkipReason::MissingUser,
            });
        };

        let text = template.render(&view_model.to_fields());
        let report = self
            .dispatcher
            .dispatch(&text, snapshot.globals.hook_urls(), &snapshot.globals.display())
            .await;

        Ok(HandleOutcome::Dispatched { report })
    }

    /// Handle a batch delivered by the portal's webhook queue, one event at
    /// a time, acknowledging each event after it has been handled.
    #[tracing::instrument(name = "relay.process_batch", skip(self, events), fields(count = events.len()))]
    pub async fn process_batch(&self, events: Vec<WebhookEvent>) -> BatchSummary {
        let mut summary = BatchSummary {
            received: events.len(),
            ..Default::default()
        };
        self.stats
            .events_received
            .fetch_add(events.len() as u64, Ordering::Relaxed);
        EventMetrics::record_received(events.len() as u64);

        for hook in events {
            if self.is_event_interesting(&hook.event) {
                match self.handle_event(&hook.event).await {
                    Ok(HandleOutcome::Dispatched { .. }) => summary.dispatched += 1,
                    Ok(HandleOutcome::Skipped { .. }) => summary.skipped += 1,
                    Err(_) => summary.failed += 1,
                }
            } else {
                summary.skipped += 1;
                self.stats.events_skipped.fetch_add(1, Ordering::Relaxed);
                EventMetrics::record_outcome(SkipReason::NotInteresting.as_str());
            }

            match self
                .portal
                .acknowledge_event(&self.listener.id, &hook.id)
                .await
            {
                Ok(()) => summary.acknowledged += 1,
                Err(e) => {
                    self.stats
                        .acknowledge_failures
                        .fetch_add(1, Ordering::Relaxed);
                    EventMetrics::record_acknowledge_failed();
                    tracing::warn!(event_id = %hook.id, error = %e, "Failed to acknowledge event");
                }
            }
        }

        summary
    }
}
