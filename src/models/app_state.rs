use camino::Utf8PathBuf;

/// Single source of truth for runtime application state.
///
/// # Thread Safety
///
/// `AppState` is wrapped in `Arc<RwLock<AppState>>` by
/// [`crate::state::StateManager`] to provide thread-safe access across the
/// application. Never access `AppState` directly - always use
/// [`StateManager`](crate::state::StateManager) methods:
/// - [`read()`](crate::state::StateManager::read) for read-only access
/// - [`update()`](crate::state::StateManager::update) for mutations with automatic change events
///
/// # Related Types
///
/// - [`crate::state::StateManager`]: Thread-safe wrapper with event emission
/// - [`crate::state::StateChange`]: Event types for state mutations
/// - [`crate::models::Configuration`]: Persisted configuration loaded into this state
#[derive(Clone, Debug, Default)]
pub struct AppState {
    // Configuration summary
    pub is_configured: bool,
    pub student_name: String,
    pub student_id: String,
    pub module_count: usize,

    // Selection
    pub selected_module: Option<String>,

    // Runtime state
    pub is_generating: bool,
    pub current_operation: String,

    // Results
    pub sheets_generated: usize,
    pub last_generated: Option<Utf8PathBuf>,
    pub last_error: Option<String>,
}

impl AppState {
    /// Whether sheet generation can be started right now.
    pub fn can_generate(&self) -> bool {
        self.is_configured && self.module_count > 0 && !self.is_generating
    }

    /// Reset generation-related state to initial values.
    pub fn reset_generation_state(&mut self) {
        self.is_generating = false;
        self.current_operation.clear();
        self.sheets_generated = 0;
        self.last_generated = None;
        self.last_error = None;
    }
}
