//! Save actor abstraction
//!
//! The persistence layer is an external collaborator. The runtime only knows
//! this trait, which lets tests plug in mocks and controllable fakes.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::SaveError;
use crate::workout::{SaveMode, WorkflowContext, WorkoutTemplate};

/// Persists workout templates on behalf of the workflow
#[async_trait]
pub trait SaveService: Send + Sync {
    /// Persist the template described by `context`
    async fn save_template(&self, context: WorkflowContext) -> Result<WorkoutTemplate, SaveError>;

    /// Persist the template and prepare a session from it.
    ///
    /// Services without a distinct launch step can rely on the default.
    async fn save_and_start(&self, context: WorkflowContext) -> Result<WorkoutTemplate, SaveError> {
        self.save_template(context).await
    }
}

/// Run one save actor to completion, bounded by `timeout` when set
pub(crate) async fn run_save(
    service: Arc<dyn SaveService>,
    mode: SaveMode,
    input: WorkflowContext,
    timeout: Option<Duration>,
) -> Result<WorkoutTemplate, SaveError> {
    let name = input.workout_name.clone();
    let call = async move {
        match mode {
            SaveMode::Template => service.save_template(input).await,
            SaveMode::TemplateAndStart => service.save_and_start(input).await,
        }
    };

    let result = match timeout {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .unwrap_or(Err(SaveError::Timeout {
                timeout_ms: limit.as_millis() as u64,
            })),
        None => call.await,
    };

    match &result {
        Ok(template) => info!(
            mode = ?mode,
            workout = %name,
            template_id = ?template.id,
            "Save actor resolved"
        ),
        Err(e) => warn!(mode = ?mode, workout = %name, error = %e, "Save actor rejected"),
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoService;

    #[async_trait]
    impl SaveService for EchoService {
        async fn save_template(&self, context: WorkflowContext) -> Result<WorkoutTemplate, SaveError> {
            Ok(WorkoutTemplate {
                id: Some("tpl-1".to_string()),
                ..context.to_template()
            })
        }
    }

    struct NeverService;

    #[async_trait]
    impl SaveService for NeverService {
        async fn save_template(&self, _context: WorkflowContext) -> Result<WorkoutTemplate, SaveError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_save_and_start_defaults_to_save_template() {
        let context = WorkflowContext {
            workout_name: " Pull ".to_string(),
            ..Default::default()
        };
        let template = run_save(Arc::new(EchoService), SaveMode::TemplateAndStart, context, None)
            .await
            .unwrap();
        assert_eq!(template.id.as_deref(), Some("tpl-1"));
        assert_eq!(template.name, "Pull");
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_turns_into_save_error() {
        let result = run_save(
            Arc::new(NeverService),
            SaveMode::Template,
            WorkflowContext::default(),
            Some(Duration::from_secs(5)),
        )
        .await;
        assert_eq!(result, Err(SaveError::Timeout { timeout_ms: 5000 }));
    }
}
