// Transition engine
//
// `transition` maps (state, context, event) to a declared Transition or `None`
// when the current state does not handle the event. `step` applies the
// transition and reports the entry action of the target state. Both are pure.

use super::actions;
use super::context::{ContextPatch, WorkflowContext};
use super::events::{MachineEvent, WorkflowEvent};
use super::state::{EntryAction, WorkoutState};

/// A declared transition.
///
/// `target: None` is a targetless transition: the context changes but the
/// state is not exited or re-entered.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub target: Option<WorkoutState>,
    pub patch: ContextPatch,
}

impl Transition {
    fn stay(patch: ContextPatch) -> Self {
        Self { target: None, patch }
    }

    fn to(target: WorkoutState, patch: ContextPatch) -> Self {
        Self {
            target: Some(target),
            patch,
        }
    }

    fn goto(target: WorkoutState) -> Self {
        Self::to(target, ContextPatch::default())
    }
}

/// Result of applying one event
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub state: WorkoutState,
    pub context: WorkflowContext,
    /// True when the target state was (re-)entered
    pub entered: bool,
    pub entry: Option<EntryAction>,
}

/// Apply one event. `None` means the event is not handled in `state` and
/// nothing changes.
pub fn step(state: WorkoutState, context: &WorkflowContext, event: &MachineEvent) -> Option<Step> {
    let Transition { target, patch } = transition(state, context, event)?;
    let context = context.merge(patch);

    Some(match target {
        Some(next) => Step {
            state: next,
            context,
            entered: true,
            entry: next.entry_action(),
        },
        None => Step {
            state,
            context,
            entered: false,
            entry: None,
        },
    })
}

pub fn transition(
    state: WorkoutState,
    context: &WorkflowContext,
    event: &MachineEvent,
) -> Option<Transition> {
    match state {
        WorkoutState::Setup => setup(context, event),
        WorkoutState::ConfiguringExercise => configuring_exercise(context, event),
        WorkoutState::Editing => editing(context, event),
        WorkoutState::Previewing => previewing(context, event),
        WorkoutState::Saving => saving(WorkoutState::Saved, event),
        WorkoutState::SavingAndStarting => saving(WorkoutState::StartingWorkout, event),
        WorkoutState::Saved => saved(event),
        WorkoutState::Error => error(event),
        WorkoutState::StartingWorkout | WorkoutState::Cancelled => None,
    }
}

/// Metadata edits accepted in both `setup` and `editing`
fn metadata(context: &WorkflowContext, event: &WorkflowEvent) -> Option<Transition> {
    let patch = match event {
        WorkflowEvent::SetWorkoutDetails {
            name,
            description,
            workout_type,
        } => actions::set_workout_details(name.as_ref(), description.as_ref(), *workout_type),
        WorkflowEvent::SetDifficulty { level } => actions::set_difficulty(*level),
        WorkflowEvent::AddTag { tag } => actions::add_tag(context, tag),
        WorkflowEvent::RemoveTag { tag } => actions::remove_tag(context, tag),
        _ => return None,
    };
    Some(Transition::stay(patch))
}

fn load_template_target(event: &WorkflowEvent) -> Option<Transition> {
    let WorkflowEvent::LoadTemplate { template } = event else {
        return None;
    };
    let target = if template.exercises.is_empty() {
        WorkoutState::Setup
    } else {
        WorkoutState::Editing
    };
    Some(Transition::to(target, actions::load_template(template)))
}

fn edit_exercise_target(context: &WorkflowContext, index: usize) -> Option<Transition> {
    actions::edit_exercise(context, index)
        .map(|patch| Transition::to(WorkoutState::ConfiguringExercise, patch))
}

fn setup(context: &WorkflowContext, event: &MachineEvent) -> Option<Transition> {
    let MachineEvent::User(event) = event else {
        return None;
    };

    match event {
        WorkflowEvent::SelectExercise { exercise } => Some(Transition::to(
            WorkoutState::ConfiguringExercise,
            actions::select_exercise(exercise),
        )),
        WorkflowEvent::LoadTemplate { .. } => load_template_target(event),
        WorkflowEvent::Reset => Some(Transition::to(WorkoutState::Setup, actions::reset_context())),
        WorkflowEvent::Cancel => Some(Transition::goto(WorkoutState::Cancelled)),
        _ => metadata(context, event),
    }
}

fn configuring_exercise(context: &WorkflowContext, event: &MachineEvent) -> Option<Transition> {
    let MachineEvent::User(event) = event else {
        return None;
    };

    match event {
        WorkflowEvent::ConfigureExercise { config } => Some(Transition::stay(
            actions::configure_exercise(context, config),
        )),
        WorkflowEvent::SelectExercise { exercise } => Some(Transition::to(
            WorkoutState::ConfiguringExercise,
            actions::select_exercise(exercise),
        )),
        // Moves to editing even when nothing was selected
        WorkflowEvent::AddExercise => Some(Transition::to(
            WorkoutState::Editing,
            actions::add_exercise(context),
        )),
        WorkflowEvent::UpdateExercise => Some(Transition::to(
            WorkoutState::Editing,
            actions::update_exercise(context),
        )),
        WorkflowEvent::Cancel => {
            let target = if context.exercises.is_empty() {
                WorkoutState::Setup
            } else {
                WorkoutState::Editing
            };
            Some(Transition::to(target, ContextPatch::default().clear_selection()))
        }
        WorkflowEvent::Reset => Some(Transition::to(WorkoutState::Setup, actions::reset_context())),
        _ => None,
    }
}

fn editing(context: &WorkflowContext, event: &MachineEvent) -> Option<Transition> {
    let MachineEvent::User(event) = event else {
        return None;
    };

    match event {
        WorkflowEvent::SelectExercise { exercise } => Some(Transition::to(
            WorkoutState::ConfiguringExercise,
            actions::select_exercise(exercise),
        )),
        WorkflowEvent::RemoveExercise { index } => Some(Transition::stay(
            actions::remove_exercise(context, *index),
        )),
        WorkflowEvent::ReorderExercises { from, to } => Some(Transition::stay(
            actions::reorder_exercises(context, *from, *to),
        )),
        WorkflowEvent::DuplicateExercise { index } => Some(Transition::stay(
            actions::duplicate_exercise(context, *index),
        )),
        WorkflowEvent::EditExercise { index } => edit_exercise_target(context, *index),
        WorkflowEvent::PreviewWorkout => Some(Transition::goto(WorkoutState::Previewing)),
        WorkflowEvent::SaveTemplate => Some(Transition::goto(WorkoutState::Saving)),
        WorkflowEvent::SaveAndStart => Some(Transition::goto(WorkoutState::SavingAndStarting)),
        WorkflowEvent::LoadTemplate { .. } => load_template_target(event),
        WorkflowEvent::Reset => Some(Transition::to(WorkoutState::Setup, actions::reset_context())),
        WorkflowEvent::Cancel => Some(Transition::goto(WorkoutState::Cancelled)),
        _ => metadata(context, event),
    }
}

fn previewing(context: &WorkflowContext, event: &MachineEvent) -> Option<Transition> {
    let MachineEvent::User(event) = event else {
        return None;
    };

    match event {
        WorkflowEvent::SaveTemplate => Some(Transition::goto(WorkoutState::Saving)),
        WorkflowEvent::SaveAndStart => Some(Transition::goto(WorkoutState::SavingAndStarting)),
        WorkflowEvent::EditExercise { index } => edit_exercise_target(context, *index),
        WorkflowEvent::Reset => Some(Transition::to(WorkoutState::Setup, actions::reset_context())),
        WorkflowEvent::Cancel => Some(Transition::goto(WorkoutState::Cancelled)),
        _ => None,
    }
}

/// Invoke-only states: nothing but the actor settlement is accepted
fn saving(on_success: WorkoutState, event: &MachineEvent) -> Option<Transition> {
    match event {
        MachineEvent::SaveSucceeded { saved_at, .. } => Some(Transition::to(
            on_success,
            actions::record_save_success(*saved_at),
        )),
        MachineEvent::SaveFailed { message, .. } => Some(Transition::to(
            WorkoutState::Editing,
            actions::record_save_failure(message),
        )),
        _ => None,
    }
}

fn saved(event: &MachineEvent) -> Option<Transition> {
    match event {
        MachineEvent::SavedExpired { .. } => Some(Transition::goto(WorkoutState::Editing)),
        MachineEvent::User(WorkflowEvent::Reset) => {
            Some(Transition::to(WorkoutState::Setup, actions::reset_context()))
        }
        MachineEvent::User(WorkflowEvent::SaveAndStart) => {
            Some(Transition::goto(WorkoutState::SavingAndStarting))
        }
        _ => None,
    }
}

fn error(event: &MachineEvent) -> Option<Transition> {
    match event {
        MachineEvent::User(WorkflowEvent::Retry) => Some(Transition::goto(WorkoutState::Saving)),
        MachineEvent::User(WorkflowEvent::Cancel) => Some(Transition::goto(WorkoutState::Cancelled)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workout::context::ExerciseConfigPatch;
    use crate::workout::state::SaveMode;
    use crate::workout::types::{Exercise, ExerciseType, WorkoutTemplate};
    use chrono::Utc;

    fn user(event: WorkflowEvent) -> MachineEvent {
        MachineEvent::User(event)
    }

    fn squat() -> Exercise {
        Exercise::new("ex-squat", "Squat", ExerciseType::Strength)
    }

    /// Replay events from `setup`, dropping the unhandled ones
    fn replay(events: Vec<WorkflowEvent>) -> (WorkoutState, WorkflowContext) {
        let mut state = WorkoutState::Setup;
        let mut context = WorkflowContext::default();
        for event in events {
            if let Some(next) = step(state, &context, &user(event)) {
                state = next.state;
                context = next.context;
            }
        }
        (state, context)
    }

    #[test]
    fn test_squat_scenario() {
        let (state, context) = replay(vec![
            WorkflowEvent::SelectExercise { exercise: squat() },
            WorkflowEvent::ConfigureExercise {
                config: ExerciseConfigPatch {
                    sets: Some(4),
                    reps: Some(8),
                    weight: Some(Some(135.0)),
                    rest_seconds: Some(60),
                    ..Default::default()
                },
            },
            WorkflowEvent::AddExercise,
        ]);

        assert_eq!(state, WorkoutState::Editing);
        assert_eq!(context.exercises.len(), 1);
        assert_eq!(context.total_exercises, 1);
        assert_eq!(context.estimated_duration, 6);
    }

    #[test]
    fn test_add_without_selection_still_reaches_editing() {
        let context = WorkflowContext::default();
        let next = step(
            WorkoutState::ConfiguringExercise,
            &context,
            &user(WorkflowEvent::AddExercise),
        )
        .unwrap();

        assert_eq!(next.state, WorkoutState::Editing);
        assert!(next.context.exercises.is_empty());
        assert_eq!(next.context.total_exercises, 0);
    }

    #[test]
    fn test_configure_is_targetless() {
        let (_, context) = replay(vec![WorkflowEvent::SelectExercise { exercise: squat() }]);
        let next = step(
            WorkoutState::ConfiguringExercise,
            &context,
            &user(WorkflowEvent::ConfigureExercise {
                config: ExerciseConfigPatch {
                    reps: Some(12),
                    ..Default::default()
                },
            }),
        )
        .unwrap();

        assert_eq!(next.state, WorkoutState::ConfiguringExercise);
        assert!(!next.entered);
        assert_eq!(next.context.config.reps, 12);
    }

    #[test]
    fn test_unhandled_events_are_dropped() {
        let context = WorkflowContext::default();
        assert!(step(WorkoutState::Setup, &context, &user(WorkflowEvent::AddExercise)).is_none());
        assert!(step(WorkoutState::Setup, &context, &user(WorkflowEvent::Retry)).is_none());
        assert!(step(
            WorkoutState::Setup,
            &context,
            &MachineEvent::SavedExpired { epoch: 1 }
        )
        .is_none());
        assert!(step(WorkoutState::Previewing, &context, &user(WorkflowEvent::AddTag {
            tag: "x".to_string()
        }))
        .is_none());
    }

    #[test]
    fn test_saving_accepts_no_user_events() {
        let context = WorkflowContext::default();
        for event in [
            WorkflowEvent::Cancel,
            WorkflowEvent::Reset,
            WorkflowEvent::SaveTemplate,
            WorkflowEvent::Retry,
        ] {
            assert!(step(WorkoutState::Saving, &context, &user(event.clone())).is_none());
            assert!(step(WorkoutState::SavingAndStarting, &context, &user(event)).is_none());
        }
    }

    #[test]
    fn test_save_settlement_paths() {
        let context = WorkflowContext {
            error: Some("previous failure".to_string()),
            ..Default::default()
        };
        let saved_at = Utc::now();

        let done = step(
            WorkoutState::Saving,
            &context,
            &MachineEvent::SaveSucceeded {
                epoch: 1,
                template: WorkoutTemplate::default(),
                saved_at,
            },
        )
        .unwrap();
        assert_eq!(done.state, WorkoutState::Saved);
        assert_eq!(done.context.last_saved_at, Some(saved_at));
        assert_eq!(done.context.error, None);
        assert_eq!(done.entry, Some(EntryAction::ScheduleExpiry));

        let failed = step(
            WorkoutState::SavingAndStarting,
            &WorkflowContext::default(),
            &MachineEvent::SaveFailed {
                epoch: 1,
                message: "offline".to_string(),
            },
        )
        .unwrap();
        assert_eq!(failed.state, WorkoutState::Editing);
        assert_eq!(failed.context.error.as_deref(), Some("offline"));
    }

    #[test]
    fn test_save_entry_actions() {
        let context = WorkflowContext::default();
        let saving = step(WorkoutState::Editing, &context, &user(WorkflowEvent::SaveTemplate)).unwrap();
        assert_eq!(saving.entry, Some(EntryAction::InvokeSave(SaveMode::Template)));

        let starting =
            step(WorkoutState::Previewing, &context, &user(WorkflowEvent::SaveAndStart)).unwrap();
        assert_eq!(starting.state, WorkoutState::SavingAndStarting);
        assert_eq!(
            starting.entry,
            Some(EntryAction::InvokeSave(SaveMode::TemplateAndStart))
        );
    }

    #[test]
    fn test_terminal_states_accept_nothing() {
        let context = WorkflowContext::default();
        for state in [WorkoutState::Cancelled, WorkoutState::StartingWorkout] {
            assert!(step(state, &context, &user(WorkflowEvent::Reset)).is_none());
            assert!(step(state, &context, &user(WorkflowEvent::Cancel)).is_none());
            assert!(step(
                state,
                &context,
                &MachineEvent::SaveFailed {
                    epoch: 0,
                    message: "late".to_string()
                }
            )
            .is_none());
        }
    }

    #[test]
    fn test_error_state_handlers() {
        let context = WorkflowContext::default();
        let retry = step(WorkoutState::Error, &context, &user(WorkflowEvent::Retry)).unwrap();
        assert_eq!(retry.state, WorkoutState::Saving);

        let cancel = step(WorkoutState::Error, &context, &user(WorkflowEvent::Cancel)).unwrap();
        assert_eq!(cancel.state, WorkoutState::Cancelled);
    }

    #[test]
    fn test_cancel_while_configuring_returns_to_previous_surface() {
        let (state, context) = replay(vec![
            WorkflowEvent::SelectExercise { exercise: squat() },
            WorkflowEvent::Cancel,
        ]);
        assert_eq!(state, WorkoutState::Setup);
        assert_eq!(context.selected_exercise, None);

        let (state, context) = replay(vec![
            WorkflowEvent::SelectExercise { exercise: squat() },
            WorkflowEvent::AddExercise,
            WorkflowEvent::SelectExercise { exercise: squat() },
            WorkflowEvent::Cancel,
        ]);
        assert_eq!(state, WorkoutState::Editing);
        assert_eq!(context.exercises.len(), 1);
        assert_eq!(context.selected_exercise, None);
    }

    #[test]
    fn test_edit_exercise_with_bad_index_is_dropped() {
        let (state, context) = replay(vec![
            WorkflowEvent::SelectExercise { exercise: squat() },
            WorkflowEvent::AddExercise,
        ]);
        assert!(step(state, &context, &user(WorkflowEvent::EditExercise { index: 4 })).is_none());

        let next = step(state, &context, &user(WorkflowEvent::EditExercise { index: 0 })).unwrap();
        assert_eq!(next.state, WorkoutState::ConfiguringExercise);
        assert_eq!(next.context.current_exercise_index, Some(0));
    }

    #[test]
    fn test_load_template_with_empty_exercise_list_stays_in_setup() {
        let (state, context) = replay(vec![WorkflowEvent::LoadTemplate {
            template: WorkoutTemplate {
                name: "Blank".to_string(),
                ..Default::default()
            },
        }]);
        assert_eq!(state, WorkoutState::Setup);
        assert_eq!(context.workout_name, "Blank");
    }

    #[test]
    fn test_saved_only_leaves_on_timer_reset_or_save_and_start() {
        let context = WorkflowContext {
            workout_name: "Kept".to_string(),
            ..Default::default()
        };

        assert!(step(WorkoutState::Saved, &context, &user(WorkflowEvent::SaveTemplate)).is_none());
        assert!(step(WorkoutState::Saved, &context, &user(WorkflowEvent::Cancel)).is_none());

        let expired =
            step(WorkoutState::Saved, &context, &MachineEvent::SavedExpired { epoch: 3 }).unwrap();
        assert_eq!(expired.state, WorkoutState::Editing);
        assert_eq!(expired.context.workout_name, "Kept");

        let reset = step(WorkoutState::Saved, &context, &user(WorkflowEvent::Reset)).unwrap();
        assert_eq!(reset.state, WorkoutState::Setup);
        assert_eq!(reset.context, WorkflowContext::default());
    }
}
