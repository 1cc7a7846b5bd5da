// Core domain types for the workout builder

use serde::{Deserialize, Serialize};

use super::context::ExerciseConfig;

/// Overall character of a workout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutType {
    #[default]
    Strength,
    Cardio,
    Mixed,
    Flexibility,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

/// Category of a catalog exercise, drives duration estimation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    Strength,
    Cardio,
    Flexibility,
    Balance,
}

/// Exercise record supplied by the catalog service.
///
/// The workflow only stores the reference; it never edits catalog data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub exercise_type: ExerciseType,
    pub difficulty: DifficultyLevel,
}

impl Exercise {
    pub fn new(id: impl Into<String>, name: impl Into<String>, exercise_type: ExerciseType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            exercise_type,
            difficulty: DifficultyLevel::default(),
        }
    }

    pub fn with_difficulty(mut self, difficulty: DifficultyLevel) -> Self {
        self.difficulty = difficulty;
        self
    }
}

/// A configured exercise inside a workout.
///
/// `id` is minted locally (`local-<n>`) and only becomes meaningful once the
/// save service persists the template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutExercise {
    pub id: String,
    pub exercise: Exercise,
    pub config: ExerciseConfig,
}

/// Template shape handed to and returned from the save service
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkoutTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub exercises: Vec<WorkoutExercise>,
    #[serde(default)]
    pub estimated_duration: u32,
    #[serde(default)]
    pub difficulty_level: DifficultyLevel,
    #[serde(default)]
    pub workout_type: WorkoutType,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enums_use_snake_case_on_the_wire() {
        let json = serde_json::to_string(&WorkoutType::Flexibility).unwrap();
        assert_eq!(json, "\"flexibility\"");

        let level: DifficultyLevel = serde_json::from_str("\"advanced\"").unwrap();
        assert_eq!(level, DifficultyLevel::Advanced);
    }

    #[test]
    fn test_template_deserializes_with_missing_optional_fields() {
        let template: WorkoutTemplate = serde_json::from_str(r#"{"name": "Leg day"}"#).unwrap();
        assert_eq!(template.name, "Leg day");
        assert!(template.exercises.is_empty());
        assert_eq!(template.workout_type, WorkoutType::Strength);
        assert_eq!(template.id, None);
    }
}
