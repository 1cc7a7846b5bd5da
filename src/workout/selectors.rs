// Derived read-only views used by the host UI to gate controls

use super::context::WorkflowContext;
use super::types::WorkoutExercise;

pub fn can_add_exercise(context: &WorkflowContext) -> bool {
    context.selected_exercise.is_some()
}

pub fn has_exercises(context: &WorkflowContext) -> bool {
    !context.exercises.is_empty()
}

/// A template needs a non-blank name and at least one exercise
pub fn can_save(context: &WorkflowContext) -> bool {
    !context.workout_name.trim().is_empty() && has_exercises(context)
}

/// Estimated minutes
pub fn total_duration(context: &WorkflowContext) -> u32 {
    context.estimated_duration
}

pub fn exercise_count(context: &WorkflowContext) -> usize {
    context.exercises.len()
}

pub fn current_exercise(context: &WorkflowContext) -> Option<&WorkoutExercise> {
    context
        .current_exercise_index
        .and_then(|index| context.exercises.get(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workout::context::ExerciseConfig;
    use crate::workout::types::{Exercise, ExerciseType};

    fn with_exercise() -> WorkflowContext {
        let exercise = Exercise::new("ex-row", "Row", ExerciseType::Cardio);
        WorkflowContext {
            exercises: vec![WorkoutExercise {
                id: "local-0".to_string(),
                exercise,
                config: ExerciseConfig::default(),
            }],
            total_exercises: 1,
            estimated_duration: 12,
            ..Default::default()
        }
    }

    #[test]
    fn test_can_save_requires_name_and_exercises() {
        let mut context = with_exercise();
        assert!(!can_save(&context));

        context.workout_name = "   ".to_string();
        assert!(!can_save(&context));

        context.workout_name = "Rowing".to_string();
        assert!(can_save(&context));

        assert!(!can_save(&WorkflowContext {
            workout_name: "Empty".to_string(),
            ..Default::default()
        }));
    }

    #[test]
    fn test_current_exercise_follows_index() {
        let mut context = with_exercise();
        assert!(current_exercise(&context).is_none());

        context.current_exercise_index = Some(0);
        assert_eq!(current_exercise(&context).map(|e| e.id.as_str()), Some("local-0"));

        context.current_exercise_index = Some(5);
        assert!(current_exercise(&context).is_none());
    }

    #[test]
    fn test_counts_and_totals() {
        let context = with_exercise();
        assert!(has_exercises(&context));
        assert_eq!(exercise_count(&context), 1);
        assert_eq!(total_duration(&context), 12);
        assert!(!can_add_exercise(&context));
    }
}
