// Workout Flow Library - guided workout-builder workflow engine
// Exposes the pure state machine and its tokio runtime

pub mod config;
pub mod error;
pub mod runtime;
pub mod telemetry;
pub mod workout;

// Re-export key types for easy access
pub use self::config::{config, init_config, EngineConfig, ObservabilityConfig, WorkoutFlowConfig};
pub use error::{SaveError, WorkflowError};
pub use runtime::{SaveService, WorkflowHandle, WorkflowRuntime};
pub use telemetry::{init_telemetry, instance_span};
pub use workout::{
    selectors, DifficultyLevel, Exercise, ExerciseConfig, ExerciseConfigPatch, ExerciseType,
    MachineEvent, SaveMode, Snapshot, WorkflowContext, WorkflowEvent, WorkflowMachine,
    WorkoutExercise, WorkoutState, WorkoutTemplate, WorkoutType,
};
