use crate::services::generator::{GenerationError, GenerationRequest, SheetGenerator};
use crate::state::StateManager;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Runs generation tasks off the caller's thread
///
/// Document building is blocking file I/O, so it runs on the tokio
/// blocking pool via [`tokio::task::spawn_blocking`]. The caller never
/// waits on the result directly; completion and failure are published
/// through the [`StateManager`] broadcast channel, which the interface
/// layer already subscribes to.
///
/// Only one generation task runs at a time. A second submission while
/// one is in flight is rejected with [`GenerationError::Busy`].
pub struct GenerationDispatcher {
    state: Arc<StateManager>,
    handle: Handle,
}

impl GenerationDispatcher {
    pub fn new(state: Arc<StateManager>, handle: Handle) -> Self {
        Self { state, handle }
    }

    /// Submit a generation request
    ///
    /// Returns immediately with the task's join handle. The handle is
    /// mostly useful in tests; normal callers watch state events instead.
    pub fn submit(&self, request: GenerationRequest) -> Result<JoinHandle<()>, GenerationError> {
        let operation = format!(
            "Generating {}...",
            SheetGenerator::sheet_label(&request.module, request.sheet_number)
        );

        if self.state.try_start_generation(operation).is_none() {
            tracing::warn!("Generation request rejected, a task is already running");
            return Err(GenerationError::Busy);
        }

        let state = Arc::clone(&self.state);
        let task = self.handle.spawn(async move {
            let result =
                tokio::task::spawn_blocking(move || SheetGenerator::new().generate(&request))
                    .await;

            match result {
                Ok(Ok(path)) => {
                    state.finish_generation(path);
                }
                Ok(Err(e)) => {
                    tracing::error!("Generation failed: {}", e);
                    state.fail_generation(e.to_string());
                }
                Err(e) => {
                    tracing::error!("Generation task panicked: {}", e);
                    state.fail_generation("Internal error while generating sheet".to_string());
                }
            }
        });

        Ok(task)
    }
}
