// Tokio runtime for workout workflows
//
// Runs the pure machine on a single task per instance, starts save actors and
// the `saved` expiry timer, and funnels their results back as events.

pub mod actor;
pub mod handle;
pub mod interpreter;

pub use actor::SaveService;
pub use handle::WorkflowHandle;
pub use interpreter::WorkflowRuntime;
