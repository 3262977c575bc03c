//! Process-wide ownership status.
//!
//! Holds the single [`StatusSnapshot`] presenters render and publishes every
//! change over a `tokio::sync::watch` channel.

use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

use crate::domain::models::{ConfiguredState, OwnershipRecord, Phase, StatusSnapshot};

/// Names the most recently routed request across all workspaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FocusTicket(u64);

impl FocusTicket {
    pub fn value(self) -> u64 {
        self.0
    }
}

pub struct StatusBoard {
    sender: watch::Sender<StatusSnapshot>,
    focus: AtomicU64,
}

impl StatusBoard {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(StatusSnapshot::default());
        Self {
            sender,
            focus: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<StatusSnapshot> {
        self.sender.subscribe()
    }

    /// Start a new focus generation; older tickets stop being able to publish.
    pub fn claim_focus(&self) -> FocusTicket {
        FocusTicket(self.focus.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_focused(&self, ticket: FocusTicket) -> bool {
        self.focus.load(Ordering::SeqCst) == ticket.0
    }

    pub fn set_phase(&self, phase: Phase) {
        self.update(|snapshot| match phase {
            Phase::Working => snapshot.working = true,
            Phase::Idle => {
                snapshot.working = false;
                snapshot.error = None;
            }
            Phase::Error => {
                snapshot.working = false;
                snapshot
                    .error
                    .get_or_insert_with(|| "ownership check failed".to_string());
            }
        });
    }

    pub fn set_error(&self, detail: impl Into<String>) {
        let detail = detail.into();
        self.update(|snapshot| {
            snapshot.working = false;
            snapshot.error = Some(detail);
        });
    }

    pub fn set_record(&self, record: Option<OwnershipRecord>) {
        self.update(|snapshot| snapshot.record = record);
    }

    pub fn set_configured(&self, configured: ConfiguredState) {
        self.update(|snapshot| snapshot.configured = configured);
    }

    pub fn set_visible(&self, visible: bool) {
        self.update(|snapshot| snapshot.visible = visible);
    }

    /// Apply `update` as one change, but only while `ticket` still holds focus
    /// and `still_current` agrees. Both checks run under the channel lock, so a
    /// newer request's transitions always land after this one.
    pub fn publish_if(
        &self,
        ticket: FocusTicket,
        still_current: impl FnOnce() -> bool,
        update: impl FnOnce(&mut StatusSnapshot),
    ) -> bool {
        self.sender.send_if_modified(|snapshot| {
            if !self.is_focused(ticket) || !still_current() {
                return false;
            }
            update(snapshot);
            snapshot.recompute();
            true
        })
    }

    fn update(&self, update: impl FnOnce(&mut StatusSnapshot)) {
        self.sender.send_modify(|snapshot| {
            update(snapshot);
            snapshot.recompute();
        });
    }
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}
