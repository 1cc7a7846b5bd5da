// Transition actions
//
// Every action is a pure function from the current context (plus the event
// payload) to a ContextPatch. Actions never perform I/O and never read the
// clock; timestamps arrive inside events.

use chrono::{DateTime, Utc};

use super::context::{ContextPatch, ExerciseConfig, ExerciseConfigPatch, WorkflowContext};
use super::types::{
    DifficultyLevel, Exercise, ExerciseType, WorkoutExercise, WorkoutTemplate, WorkoutType,
};

const SECONDS_PER_REP: f64 = 3.0;

pub fn set_workout_details(
    name: Option<&String>,
    description: Option<&String>,
    workout_type: Option<WorkoutType>,
) -> ContextPatch {
    ContextPatch {
        workout_name: name.cloned(),
        workout_description: description.cloned(),
        workout_type,
        ..Default::default()
    }
}

pub fn set_difficulty(level: DifficultyLevel) -> ContextPatch {
    ContextPatch {
        difficulty_level: Some(level),
        ..Default::default()
    }
}

/// Tags behave as an ordered set: blanks and duplicates are ignored
pub fn add_tag(context: &WorkflowContext, tag: &str) -> ContextPatch {
    let tag = tag.trim();
    if tag.is_empty() || context.tags.iter().any(|existing| existing == tag) {
        return ContextPatch::default();
    }

    let mut tags = context.tags.clone();
    tags.push(tag.to_string());
    ContextPatch {
        tags: Some(tags),
        ..Default::default()
    }
}

pub fn remove_tag(context: &WorkflowContext, tag: &str) -> ContextPatch {
    let tag = tag.trim();
    if !context.tags.iter().any(|existing| existing == tag) {
        return ContextPatch::default();
    }

    ContextPatch {
        tags: Some(
            context
                .tags
                .iter()
                .filter(|existing| existing.as_str() != tag)
                .cloned()
                .collect(),
        ),
        ..Default::default()
    }
}

/// Stage a freshly picked catalog exercise with default configuration
pub fn select_exercise(exercise: &Exercise) -> ContextPatch {
    ContextPatch {
        selected_exercise: Some(Some(exercise.clone())),
        current_exercise_index: Some(None),
        config: Some(ExerciseConfig::default()),
        ..Default::default()
    }
}

pub fn configure_exercise(context: &WorkflowContext, partial: &ExerciseConfigPatch) -> ContextPatch {
    ContextPatch {
        config: Some(context.config.merged(partial)),
        ..Default::default()
    }
}

/// Minutes one configured exercise contributes to the workout
pub fn estimate_minutes(exercise_type: ExerciseType, config: &ExerciseConfig) -> f64 {
    match exercise_type {
        ExerciseType::Strength => {
            let sets = f64::from(config.sets);
            let work = sets * f64::from(config.reps) * SECONDS_PER_REP;
            let rest = f64::from(config.rest_seconds) * sets;
            (work + rest) / 60.0
        }
        ExerciseType::Cardio => f64::from(config.duration_seconds.unwrap_or(0)) / 60.0,
        ExerciseType::Flexibility | ExerciseType::Balance => 0.0,
    }
}

/// Append the staged exercise.
///
/// Without a selected exercise the list is left untouched; the selection is
/// cleared either way.
pub fn add_exercise(context: &WorkflowContext) -> ContextPatch {
    let Some(exercise) = context.selected_exercise.as_ref() else {
        return ContextPatch::default().clear_selection();
    };

    let added = estimate_minutes(exercise.exercise_type, &context.config);
    let estimated = (f64::from(context.estimated_duration) + added).round() as u32;

    let mut exercises = context.exercises.clone();
    exercises.push(WorkoutExercise {
        id: local_id(context.next_local_id),
        exercise: exercise.clone(),
        config: context.config.clone(),
    });

    ContextPatch {
        exercises: Some(exercises),
        estimated_duration: Some(estimated),
        next_local_id: Some(context.next_local_id + 1),
        ..Default::default()
    }
    .clear_selection()
}

/// Remove exactly one exercise; out-of-range indices change nothing
pub fn remove_exercise(context: &WorkflowContext, index: usize) -> ContextPatch {
    if index >= context.exercises.len() {
        return ContextPatch::default();
    }

    let mut exercises = context.exercises.clone();
    exercises.remove(index);
    ContextPatch {
        exercises: Some(exercises),
        ..Default::default()
    }
}

pub fn reorder_exercises(context: &WorkflowContext, from: usize, to: usize) -> ContextPatch {
    let len = context.exercises.len();
    if from >= len || to >= len || from == to {
        return ContextPatch::default();
    }

    let mut exercises = context.exercises.clone();
    let moved = exercises.remove(from);
    exercises.insert(to, moved);
    ContextPatch {
        exercises: Some(exercises),
        ..Default::default()
    }
}

/// Load an existing exercise into the staging area, `None` for a bad index
pub fn edit_exercise(context: &WorkflowContext, index: usize) -> Option<ContextPatch> {
    let existing = context.exercises.get(index)?;
    Some(ContextPatch {
        selected_exercise: Some(Some(existing.exercise.clone())),
        current_exercise_index: Some(Some(index)),
        config: Some(existing.config.clone()),
        ..Default::default()
    })
}

/// Write the staged configuration back over the exercise being edited
pub fn update_exercise(context: &WorkflowContext) -> ContextPatch {
    let target = context
        .current_exercise_index
        .zip(context.selected_exercise.as_ref())
        .filter(|(index, _)| *index < context.exercises.len());

    let Some((index, exercise)) = target else {
        return ContextPatch::default().clear_selection();
    };

    let mut exercises = context.exercises.clone();
    exercises[index] = WorkoutExercise {
        id: exercises[index].id.clone(),
        exercise: exercise.clone(),
        config: context.config.clone(),
    };

    ContextPatch {
        exercises: Some(exercises),
        ..Default::default()
    }
    .clear_selection()
}

/// Insert a copy right after `index` with a fresh local id
pub fn duplicate_exercise(context: &WorkflowContext, index: usize) -> ContextPatch {
    let Some(original) = context.exercises.get(index) else {
        return ContextPatch::default();
    };

    let mut exercises = context.exercises.clone();
    exercises.insert(
        index + 1,
        WorkoutExercise {
            id: local_id(context.next_local_id),
            ..original.clone()
        },
    );

    ContextPatch {
        exercises: Some(exercises),
        next_local_id: Some(context.next_local_id + 1),
        ..Default::default()
    }
}

/// Seed a fresh context from a stored template
pub fn load_template(template: &WorkoutTemplate) -> ContextPatch {
    ContextPatch::replace_with(WorkflowContext {
        workout_name: template.name.clone(),
        workout_description: template.description.clone(),
        workout_type: template.workout_type,
        difficulty_level: template.difficulty_level,
        tags: template.tags.clone(),
        exercises: template.exercises.clone(),
        estimated_duration: template.estimated_duration,
        next_local_id: next_local_id_after(&template.exercises),
        ..Default::default()
    })
}

pub fn reset_context() -> ContextPatch {
    ContextPatch::replace_with(WorkflowContext::default())
}

pub fn record_save_success(saved_at: DateTime<Utc>) -> ContextPatch {
    ContextPatch {
        last_saved_at: Some(Some(saved_at)),
        error: Some(None),
        ..Default::default()
    }
}

pub fn record_save_failure(message: &str) -> ContextPatch {
    ContextPatch {
        error: Some(Some(message.to_string())),
        ..Default::default()
    }
}

fn local_id(counter: u64) -> String {
    format!("local-{counter}")
}

/// First counter value that cannot collide with a `local-<n>` id already in `exercises`
fn next_local_id_after(exercises: &[WorkoutExercise]) -> u64 {
    exercises
        .iter()
        .filter_map(|e| e.id.strip_prefix("local-")?.parse::<u64>().ok())
        .map(|n| n + 1)
        .max()
        .unwrap_or(0)
        .max(exercises.len() as u64)
}
