use tokio::sync::{mpsc, oneshot, watch};
use uuid::Uuid;

use super::interpreter::Envelope;
use crate::error::WorkflowError;
use crate::workout::{Snapshot, WorkflowEvent};

/// Cloneable handle the host uses to talk to one running workflow
#[derive(Debug, Clone)]
pub struct WorkflowHandle {
    workflow_id: Uuid,
    events: mpsc::Sender<Envelope>,
    snapshots: watch::Receiver<Snapshot>,
}

impl WorkflowHandle {
    pub(crate) fn new(
        workflow_id: Uuid,
        events: mpsc::Sender<Envelope>,
        snapshots: watch::Receiver<Snapshot>,
    ) -> Self {
        Self {
            workflow_id,
            events,
            snapshots,
        }
    }

    pub fn id(&self) -> Uuid {
        self.workflow_id
    }

    /// Dispatch an event and wait until it has been processed.
    ///
    /// Returns the snapshot right after the event. Effects the event started
    /// (save actors, timers) settle later.
    pub async fn send(&self, event: WorkflowEvent) -> Result<Snapshot, WorkflowError> {
        let name = event.name();
        let (reply_tx, reply_rx) = oneshot::channel();
        self.events
            .send(Envelope {
                event: event.into(),
                reply: Some(reply_tx),
            })
            .await
            .map_err(|_| WorkflowError::RuntimeClosed)?;

        reply_rx
            .await
            .map_err(|_| WorkflowError::ReplyDropped { event: name })
    }

    /// Queue an event without waiting for it to be processed
    pub async fn dispatch(&self, event: WorkflowEvent) -> Result<(), WorkflowError> {
        self.events
            .send(Envelope {
                event: event.into(),
                reply: None,
            })
            .await
            .map_err(|_| WorkflowError::RuntimeClosed)
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    pub fn matches(&self, name: &str) -> bool {
        self.snapshots.borrow().matches(name)
    }

    /// Wait until a published snapshot satisfies `predicate`
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&Snapshot) -> bool,
    ) -> Result<Snapshot, WorkflowError> {
        let mut snapshots = self.snapshots.clone();
        let snapshot = snapshots
            .wait_for(predicate)
            .await
            .map_err(|_| WorkflowError::RuntimeClosed)?
            .clone();
        Ok(snapshot)
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }
}
