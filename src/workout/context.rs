// Workflow context - the data bag mutated by transitions
//
// Context values are never mutated in place. Actions produce a ContextPatch and
// `WorkflowContext::merge` builds the next value, so every intermediate context
// can be inspected on its own.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::types::{DifficultyLevel, Exercise, WorkoutExercise, WorkoutTemplate, WorkoutType};

/// Staging fields for the exercise currently being added or edited
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseConfig {
    pub sets: u32,
    pub reps: u32,
    pub weight: Option<f64>,
    pub duration_seconds: Option<u32>,
    pub distance: Option<f64>,
    pub rest_seconds: u32,
    pub notes: String,
}

impl Default for ExerciseConfig {
    fn default() -> Self {
        Self {
            sets: 3,
            reps: 10,
            weight: None,
            duration_seconds: None,
            distance: None,
            rest_seconds: 60,
            notes: String::new(),
        }
    }
}

/// Partial update carried by `CONFIGURE_EXERCISE`; absent fields are left alone.
///
/// The nullable fields use `Some(None)` for an explicit `null`, which clears them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExerciseConfigPatch {
    pub sets: Option<u32>,
    pub reps: Option<u32>,
    #[serde(
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub weight: Option<Option<f64>>,
    #[serde(
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration_seconds: Option<Option<u32>>,
    #[serde(
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub distance: Option<Option<f64>>,
    pub rest_seconds: Option<u32>,
    pub notes: Option<String>,
}

// Only called when the key is present, so `null` becomes Some(None)
fn present_or_null<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl ExerciseConfig {
    /// Shallow merge of a partial configuration
    pub fn merged(&self, patch: &ExerciseConfigPatch) -> Self {
        Self {
            sets: patch.sets.unwrap_or(self.sets),
            reps: patch.reps.unwrap_or(self.reps),
            weight: patch.weight.unwrap_or(self.weight),
            duration_seconds: patch.duration_seconds.unwrap_or(self.duration_seconds),
            distance: patch.distance.unwrap_or(self.distance),
            rest_seconds: patch.rest_seconds.unwrap_or(self.rest_seconds),
            notes: patch.notes.clone().unwrap_or_else(|| self.notes.clone()),
        }
    }
}

/// Data owned by one workout-builder instance
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkflowContext {
    pub workout_name: String,
    pub workout_description: String,
    pub workout_type: WorkoutType,
    pub difficulty_level: DifficultyLevel,
    pub tags: Vec<String>,

    pub exercises: Vec<WorkoutExercise>,
    pub current_exercise_index: Option<usize>,
    pub selected_exercise: Option<Exercise>,
    pub config: ExerciseConfig,

    /// Minutes, accumulated on every ADD_EXERCISE
    pub estimated_duration: u32,
    /// Always equal to `exercises.len()`
    pub total_exercises: usize,

    pub error: Option<String>,
    pub last_saved_at: Option<DateTime<Utc>>,

    /// Counter backing local exercise ids
    pub next_local_id: u64,
}

/// Partial context produced by an action.
///
/// Nullable context fields use `Option<Option<T>>`: the outer `None` means
/// "leave unchanged", `Some(None)` clears the field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContextPatch {
    pub workout_name: Option<String>,
    pub workout_description: Option<String>,
    pub workout_type: Option<WorkoutType>,
    pub difficulty_level: Option<DifficultyLevel>,
    pub tags: Option<Vec<String>>,
    pub exercises: Option<Vec<WorkoutExercise>>,
    pub current_exercise_index: Option<Option<usize>>,
    pub selected_exercise: Option<Option<Exercise>>,
    pub config: Option<ExerciseConfig>,
    pub estimated_duration: Option<u32>,
    pub error: Option<Option<String>>,
    pub last_saved_at: Option<Option<DateTime<Utc>>>,
    pub next_local_id: Option<u64>,
    /// Replace the whole context before applying the other fields
    pub replace: Option<Box<WorkflowContext>>,
}

impl ContextPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Patch that swaps in a complete context value
    pub fn replace_with(context: WorkflowContext) -> Self {
        Self {
            replace: Some(Box::new(context)),
            ..Default::default()
        }
    }

    /// Clear the configuration sub-flow selection
    pub fn clear_selection(mut self) -> Self {
        self.selected_exercise = Some(None);
        self.current_exercise_index = Some(None);
        self
    }
}

impl WorkflowContext {
    /// Build the next context value from this one and a patch.
    ///
    /// `total_exercises` is always recomputed from the resulting exercise list.
    pub fn merge(&self, patch: ContextPatch) -> Self {
        let mut next = match patch.replace {
            Some(replacement) => *replacement,
            None => self.clone(),
        };

        if let Some(name) = patch.workout_name {
            next.workout_name = name;
        }
        if let Some(description) = patch.workout_description {
            next.workout_description = description;
        }
        if let Some(workout_type) = patch.workout_type {
            next.workout_type = workout_type;
        }
        if let Some(level) = patch.difficulty_level {
            next.difficulty_level = level;
        }
        if let Some(tags) = patch.tags {
            next.tags = tags;
        }
        if let Some(exercises) = patch.exercises {
            next.exercises = exercises;
        }
        if let Some(index) = patch.current_exercise_index {
            next.current_exercise_index = index;
        }
        if let Some(selected) = patch.selected_exercise {
            next.selected_exercise = selected;
        }
        if let Some(config) = patch.config {
            next.config = config;
        }
        if let Some(minutes) = patch.estimated_duration {
            next.estimated_duration = minutes;
        }
        if let Some(error) = patch.error {
            next.error = error;
        }
        if let Some(saved_at) = patch.last_saved_at {
            next.last_saved_at = saved_at;
        }
        if let Some(counter) = patch.next_local_id {
            next.next_local_id = counter;
        }

        next.total_exercises = next.exercises.len();
        next
    }

    /// Payload handed to the save service
    pub fn to_template(&self) -> WorkoutTemplate {
        WorkoutTemplate {
            id: None,
            name: self.workout_name.trim().to_string(),
            description: self.workout_description.clone(),
            exercises: self.exercises.clone(),
            estimated_duration: self.estimated_duration,
            difficulty_level: self.difficulty_level,
            workout_type: self.workout_type,
            tags: self.tags.clone(),
        }
    }
}
