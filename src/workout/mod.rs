// Workout builder workflow
//
// Pure core of the guided workout-builder flow: domain types, context,
// event contract, transition engine and selectors. Nothing in this module
// performs I/O; the tokio runtime in `crate::runtime` drives it.

pub mod actions;
pub mod context;
pub mod engine;
pub mod events;
pub mod machine;
pub mod selectors;
pub mod state;
pub mod types;

pub use context::{ContextPatch, ExerciseConfig, ExerciseConfigPatch, WorkflowContext};
pub use engine::{step, transition, Step, Transition};
pub use events::{MachineEvent, WorkflowEvent};
pub use machine::{Effect, Snapshot, TransitionRecord, WorkflowMachine};
pub use state::{EntryAction, SaveMode, WorkoutState};
pub use types::{
    DifficultyLevel, Exercise, ExerciseType, WorkoutExercise, WorkoutTemplate, WorkoutType,
};
