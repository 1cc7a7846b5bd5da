use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, info};
use uuid::Uuid;

use super::context::WorkflowContext;
use super::engine;
use super::events::MachineEvent;
use super::state::{EntryAction, SaveMode, WorkoutState};

pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Side effect requested by a state entry, executed by the runtime
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    InvokeSave {
        mode: SaveMode,
        input: WorkflowContext,
        epoch: u64,
    },
    ScheduleExpiry {
        epoch: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub from_state: WorkoutState,
    pub to_state: WorkoutState,
    pub event: String,
    pub epoch: u64,
    pub timestamp: DateTime<Utc>,
}

/// Read-only view of a machine at one point in time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub workflow_id: Uuid,
    pub state: WorkoutState,
    pub context: WorkflowContext,
    pub epoch: u64,
}

impl Snapshot {
    pub fn matches(&self, name: &str) -> bool {
        self.state.name() == name
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

/// One workout-builder instance.
///
/// Owns the active state, the context and the entry epoch. The epoch is bumped
/// on every state entry; internal events tagged with an older epoch belong to
/// a state instance that has already been left and are discarded.
pub struct WorkflowMachine {
    id: Uuid,
    state: WorkoutState,
    context: WorkflowContext,
    epoch: u64,
    history: VecDeque<TransitionRecord>,
    history_limit: usize,
}

impl std::fmt::Debug for WorkflowMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowMachine")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("epoch", &self.epoch)
            .field("exercises", &self.context.exercises.len())
            .field("history", &self.history.len())
            .finish()
    }
}

impl Default for WorkflowMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowMachine {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: WorkoutState::Setup,
            context: WorkflowContext::default(),
            epoch: 0,
            history: VecDeque::new(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> WorkoutState {
        self.state
    }

    pub fn context(&self) -> &WorkflowContext {
        &self.context
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn history(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.history.iter()
    }

    pub fn matches(&self, name: &str) -> bool {
        self.state.name() == name
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            workflow_id: self.id,
            state: self.state,
            context: self.context.clone(),
            epoch: self.epoch,
        }
    }

    /// Process one event to completion and return the entry effect, if any
    pub fn handle(&mut self, event: &MachineEvent) -> Option<Effect> {
        if let Some(epoch) = event.epoch() {
            if epoch != self.epoch {
                debug!(
                    workflow_id = %self.id,
                    state = %self.state,
                    event = event.name(),
                    event_epoch = epoch,
                    current_epoch = self.epoch,
                    "Discarding stale internal event"
                );
                return None;
            }
        }

        let Some(step) = engine::step(self.state, &self.context, event) else {
            debug!(
                workflow_id = %self.id,
                state = %self.state,
                event = event.name(),
                "Event not handled in current state"
            );
            return None;
        };

        let from_state = self.state;
        if step.entered {
            self.epoch += 1;
        }
        self.state = step.state;
        self.context = step.context;
        debug_assert_eq!(self.context.total_exercises, self.context.exercises.len());

        self.record_transition(from_state, event.name());

        step.entry.map(|action| match action {
            EntryAction::InvokeSave(mode) => Effect::InvokeSave {
                mode,
                input: self.context.clone(),
                epoch: self.epoch,
            },
            EntryAction::ScheduleExpiry => Effect::ScheduleExpiry { epoch: self.epoch },
        })
    }

    fn record_transition(&mut self, from_state: WorkoutState, event: &str) {
        let record = TransitionRecord {
            from_state,
            to_state: self.state,
            event: event.to_string(),
            epoch: self.epoch,
            timestamp: Utc::now(),
        };

        info!(
            workflow_id = %self.id,
            from_state = %record.from_state,
            to_state = %record.to_state,
            event = %record.event,
            epoch = record.epoch,
            exercises = self.context.total_exercises,
            "Workout workflow transition"
        );

        if self.history_limit == 0 {
            return;
        }
        if self.history.len() == self.history_limit {
            self.history.pop_front();
        }
        self.history.push_back(record);
    }
}
