// Event contract for the workout builder

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::context::ExerciseConfigPatch;
use super::types::{DifficultyLevel, Exercise, WorkoutTemplate, WorkoutType};

/// Events the host UI may dispatch.
///
/// The set is closed. Events a state does not declare are dropped by the
/// engine without touching state or context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowEvent {
    SetWorkoutDetails {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        workout_type: Option<WorkoutType>,
    },
    SetDifficulty {
        level: DifficultyLevel,
    },
    AddTag {
        tag: String,
    },
    RemoveTag {
        tag: String,
    },
    SelectExercise {
        exercise: Exercise,
    },
    ConfigureExercise {
        config: ExerciseConfigPatch,
    },
    AddExercise,
    RemoveExercise {
        index: usize,
    },
    ReorderExercises {
        from: usize,
        to: usize,
    },
    EditExercise {
        index: usize,
    },
    UpdateExercise,
    DuplicateExercise {
        index: usize,
    },
    PreviewWorkout,
    SaveTemplate,
    SaveAndStart,
    LoadTemplate {
        template: WorkoutTemplate,
    },
    Reset,
    Cancel,
    Retry,
}

impl WorkflowEvent {
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowEvent::SetWorkoutDetails { .. } => "SET_WORKOUT_DETAILS",
            WorkflowEvent::SetDifficulty { .. } => "SET_DIFFICULTY",
            WorkflowEvent::AddTag { .. } => "ADD_TAG",
            WorkflowEvent::RemoveTag { .. } => "REMOVE_TAG",
            WorkflowEvent::SelectExercise { .. } => "SELECT_EXERCISE",
            WorkflowEvent::ConfigureExercise { .. } => "CONFIGURE_EXERCISE",
            WorkflowEvent::AddExercise => "ADD_EXERCISE",
            WorkflowEvent::RemoveExercise { .. } => "REMOVE_EXERCISE",
            WorkflowEvent::ReorderExercises { .. } => "REORDER_EXERCISES",
            WorkflowEvent::EditExercise { .. } => "EDIT_EXERCISE",
            WorkflowEvent::UpdateExercise => "UPDATE_EXERCISE",
            WorkflowEvent::DuplicateExercise { .. } => "DUPLICATE_EXERCISE",
            WorkflowEvent::PreviewWorkout => "PREVIEW_WORKOUT",
            WorkflowEvent::SaveTemplate => "SAVE_TEMPLATE",
            WorkflowEvent::SaveAndStart => "SAVE_AND_START",
            WorkflowEvent::LoadTemplate { .. } => "LOAD_TEMPLATE",
            WorkflowEvent::Reset => "RESET",
            WorkflowEvent::Cancel => "CANCEL",
            WorkflowEvent::Retry => "RETRY",
        }
    }
}

/// Everything the machine consumes: user events plus the internal events
/// produced by save actors and the `saved` expiry timer.
///
/// Internal events carry the entry epoch of the state that produced them.
#[derive(Debug, Clone, PartialEq)]
pub enum MachineEvent {
    User(WorkflowEvent),
    SaveSucceeded {
        epoch: u64,
        template: WorkoutTemplate,
        saved_at: DateTime<Utc>,
    },
    SaveFailed {
        epoch: u64,
        message: String,
    },
    SavedExpired {
        epoch: u64,
    },
}

impl MachineEvent {
    pub fn name(&self) -> &'static str {
        match self {
            MachineEvent::User(event) => event.name(),
            MachineEvent::SaveSucceeded { .. } => "done.invoke.save",
            MachineEvent::SaveFailed { .. } => "error.invoke.save",
            MachineEvent::SavedExpired { .. } => "after.saved",
        }
    }

    /// Entry epoch for internal events, `None` for user events
    pub fn epoch(&self) -> Option<u64> {
        match self {
            MachineEvent::User(_) => None,
            MachineEvent::SaveSucceeded { epoch, .. }
            | MachineEvent::SaveFailed { epoch, .. }
            | MachineEvent::SavedExpired { epoch } => Some(*epoch),
        }
    }
}

impl From<WorkflowEvent> for MachineEvent {
    fn from(event: WorkflowEvent) -> Self {
        MachineEvent::User(event)
    }
}
