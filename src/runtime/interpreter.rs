// Serial event loop for one workflow instance
//
// A single tokio task owns the WorkflowMachine and drains one mpsc queue.
// User dispatches, save actor settlements and expiry timers all arrive on
// that queue, so the context is only ever touched by this task.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, Instrument};

use super::actor::{run_save, SaveService};
use super::handle::WorkflowHandle;
use crate::config::EngineConfig;
use crate::telemetry::instance_span;
use crate::workout::{
    Effect, MachineEvent, SaveMode, Snapshot, WorkflowContext, WorkflowMachine, WorkoutState,
};

#[derive(Debug)]
pub(crate) struct Envelope {
    pub(crate) event: MachineEvent,
    pub(crate) reply: Option<oneshot::Sender<Snapshot>>,
}

impl Envelope {
    fn internal(event: MachineEvent) -> Self {
        Self { event, reply: None }
    }
}

/// Entry point for running workout workflows on tokio
pub struct WorkflowRuntime;

impl WorkflowRuntime {
    /// Start a fresh instance in `setup`
    pub fn spawn(service: Arc<dyn SaveService>, config: &EngineConfig) -> WorkflowHandle {
        let machine = WorkflowMachine::new().with_history_limit(config.history_limit);
        Self::spawn_machine(machine, service, config)
    }

    /// Drive an existing machine. Must be called from within a tokio runtime.
    pub fn spawn_machine(
        machine: WorkflowMachine,
        service: Arc<dyn SaveService>,
        config: &EngineConfig,
    ) -> WorkflowHandle {
        let workflow_id = machine.id();
        let (events_tx, events_rx) = mpsc::channel(config.event_buffer.max(1));
        let (snapshot_tx, snapshot_rx) = watch::channel(machine.snapshot());

        let interpreter = Interpreter {
            machine,
            service,
            events: events_rx,
            queue: events_tx.downgrade(),
            snapshots: snapshot_tx,
            saved_expiry: config.saved_expiry(),
            save_timeout: config.save_timeout(),
            expiry_timer: None,
        };
        tokio::spawn(interpreter.run().instrument(instance_span(workflow_id)));

        WorkflowHandle::new(workflow_id, events_tx, snapshot_rx)
    }
}

struct Interpreter {
    machine: WorkflowMachine,
    service: Arc<dyn SaveService>,
    events: mpsc::Receiver<Envelope>,
    /// Weak so that spawned actors and timers never keep the loop alive
    queue: mpsc::WeakSender<Envelope>,
    snapshots: watch::Sender<Snapshot>,
    saved_expiry: Duration,
    save_timeout: Option<Duration>,
    expiry_timer: Option<JoinHandle<()>>,
}

impl Interpreter {
    async fn run(mut self) {
        info!(state = %self.machine.state(), "Workflow interpreter started");

        while let Some(Envelope { event, reply }) = self.events.recv().await {
            if let Some(effect) = self.machine.handle(&event) {
                self.execute(effect);
            }
            if self.machine.state() != WorkoutState::Saved {
                self.cancel_expiry();
            }

            let snapshot = self.machine.snapshot();
            self.snapshots.send_replace(snapshot.clone());
            if let Some(reply) = reply {
                let _ = reply.send(snapshot);
            }
        }

        self.cancel_expiry();
        info!(state = %self.machine.state(), "Workflow interpreter stopped");
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::InvokeSave { mode, input, epoch } => self.start_save(mode, input, epoch),
            Effect::ScheduleExpiry { epoch } => self.schedule_expiry(epoch),
        }
    }

    /// One actor per state entry; its settlement re-enters through the queue
    fn start_save(&self, mode: SaveMode, input: WorkflowContext, epoch: u64) {
        debug!(mode = ?mode, epoch, "Starting save actor");

        let service = Arc::clone(&self.service);
        let queue = self.queue.clone();
        let timeout = self.save_timeout;
        tokio::spawn(
            async move {
                let event = match run_save(service, mode, input, timeout).await {
                    Ok(template) => MachineEvent::SaveSucceeded {
                        epoch,
                        template,
                        saved_at: chrono::Utc::now(),
                    },
                    Err(e) => MachineEvent::SaveFailed {
                        epoch,
                        message: e.to_string(),
                    },
                };
                post(&queue, event).await;
            }
            .in_current_span(),
        );
    }

    fn schedule_expiry(&mut self, epoch: u64) {
        self.cancel_expiry();
        debug!(epoch, delay_ms = self.saved_expiry.as_millis() as u64, "Arming saved expiry");

        let queue = self.queue.clone();
        let delay = self.saved_expiry;
        self.expiry_timer = Some(tokio::spawn(
            async move {
                tokio::time::sleep(delay).await;
                post(&queue, MachineEvent::SavedExpired { epoch }).await;
            }
            .in_current_span(),
        ));
    }

    fn cancel_expiry(&mut self) {
        if let Some(timer) = self.expiry_timer.take() {
            timer.abort();
        }
    }
}

async fn post(queue: &mpsc::WeakSender<Envelope>, event: MachineEvent) {
    match queue.upgrade() {
        Some(sender) => {
            if sender.send(Envelope::internal(event)).await.is_err() {
                debug!("Workflow interpreter gone before internal event was delivered");
            }
        }
        None => debug!(event = event.name(), "Dropping internal event for closed workflow"),
    }
}
