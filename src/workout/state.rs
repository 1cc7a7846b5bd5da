use serde::{Deserialize, Serialize};
use std::fmt;

/// States of the workout builder. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkoutState {
    /// Basic workout metadata being entered
    #[default]
    Setup,
    /// A catalog exercise is picked and its fields are being staged
    ConfiguringExercise,
    /// Main editing surface
    Editing,
    /// Read-only review before save
    Previewing,
    /// Template-only save in flight
    Saving,
    /// Save-then-launch in flight
    SavingAndStarting,
    /// Save succeeded; expires back to editing
    Saved,
    StartingWorkout,
    Cancelled,
    /// Declared with RETRY/CANCEL handlers but no transition targets it
    Error,
}

/// Which save actor a saving state invokes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveMode {
    Template,
    TemplateAndStart,
}

/// Work a state asks for on entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryAction {
    InvokeSave(SaveMode),
    ScheduleExpiry,
}

impl WorkoutState {
    pub const ALL: [WorkoutState; 10] = [
        WorkoutState::Setup,
        WorkoutState::ConfiguringExercise,
        WorkoutState::Editing,
        WorkoutState::Previewing,
        WorkoutState::Saving,
        WorkoutState::SavingAndStarting,
        WorkoutState::Saved,
        WorkoutState::StartingWorkout,
        WorkoutState::Cancelled,
        WorkoutState::Error,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            WorkoutState::Setup => "setup",
            WorkoutState::ConfiguringExercise => "configuringExercise",
            WorkoutState::Editing => "editing",
            WorkoutState::Previewing => "previewing",
            WorkoutState::Saving => "saving",
            WorkoutState::SavingAndStarting => "savingAndStarting",
            WorkoutState::Saved => "saved",
            WorkoutState::StartingWorkout => "startingWorkout",
            WorkoutState::Cancelled => "cancelled",
            WorkoutState::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkoutState::StartingWorkout | WorkoutState::Cancelled)
    }

    pub fn entry_action(&self) -> Option<EntryAction> {
        match self {
            WorkoutState::Saving => Some(EntryAction::InvokeSave(SaveMode::Template)),
            WorkoutState::SavingAndStarting => {
                Some(EntryAction::InvokeSave(SaveMode::TemplateAndStart))
            }
            WorkoutState::Saved => Some(EntryAction::ScheduleExpiry),
            _ => None,
        }
    }

    /// Look a state up by its name as used by `matches`
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|state| state.name() == name)
    }
}

impl fmt::Display for WorkoutState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
