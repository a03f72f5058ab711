// State management module
//
// This module provides the StateManager which wraps AppState with thread-safe access
// using Arc<RwLock<T>> and emits change events for GUI updates.

use crate::models::{AppState, Configuration};
use camino::Utf8PathBuf;
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

/// Change events emitted when state is modified
///
/// These events are emitted to notify interested parties (primarily the GUI)
/// about state changes without requiring them to poll the state.
#[derive(Clone, Debug, PartialEq)]
pub enum StateChange {
    /// Configuration has been loaded or updated
    ConfigurationChanged {
        is_configured: bool,
        module_count: usize,
    },

    /// A sheet generation task has started
    GenerationStarted,

    /// A sheet generation task has completed
    GenerationFinished {
        path: Utf8PathBuf,
    },

    /// A sheet generation task has failed
    GenerationFailed {
        message: String,
    },

    /// Current operation description has changed
    OperationChanged {
        operation: String,
    },

    /// Module selection has changed
    SelectionChanged {
        module: Option<String>,
    },

    /// Generation state has been reset
    StateReset,
}

/// Thread-safe state manager with event emission
///
/// This is the central state management component that:
/// - Provides thread-safe access to [`AppState`] via `Arc<RwLock<T>>`
/// - Detects state changes and emits [`StateChange`] events
/// - Supports subscribing to state changes via tokio broadcast channels
///
/// # Usage
///
/// Always use `StateManager` instead of accessing [`AppState`] directly:
/// - [`read()`](Self::read) for reading state without cloning
/// - [`update()`](Self::update) for mutations with automatic event emission
/// - [`subscribe()`](Self::subscribe) for listening to state changes
pub struct StateManager {
    /// The application state protected by RwLock for thread-safe access
    state: Arc<RwLock<AppState>>,

    /// Broadcast channel for emitting state change events
    /// Multiple subscribers can listen for state changes
    state_tx: broadcast::Sender<StateChange>,
}

impl StateManager {
    /// Create a new StateManager with default state
    ///
    /// # Returns
    /// A new StateManager with a broadcast channel buffer of 100 events
    pub fn new() -> Self {
        let (state_tx, _) = broadcast::channel(100);
        Self {
            state: Arc::new(RwLock::new(AppState::default())),
            state_tx,
        }
    }

    /// Get a read-only snapshot of the current state
    ///
    /// This clones the entire state, so it's safe to use without holding locks.
    /// For checking individual fields, consider using `read()` with a closure.
    pub fn snapshot(&self) -> AppState {
        self.state.read().unwrap().clone()
    }

    /// Execute a function with read access to the state
    ///
    /// # Example
    /// ```ignore
    /// let busy = state_manager.read(|state| state.is_generating);
    /// ```
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&AppState) -> R,
    {
        let state = self.state.read().unwrap();
        f(&state)
    }

    /// Update the state and emit change events
    ///
    /// This is the primary way to modify state. It:
    /// 1. Captures the old state
    /// 2. Applies the update function
    /// 3. Detects what changed
    /// 4. Emits appropriate events
    ///
    /// # Returns
    /// A vector of StateChange events that were emitted
    pub fn update<F>(&self, update_fn: F) -> Vec<StateChange>
    where
        F: FnOnce(&mut AppState),
    {
        let mut state = self.state.write().unwrap();
        let old_state = state.clone();

        update_fn(&mut state);

        let changes = self.detect_changes(&old_state, &state);

        for change in &changes {
            // Ignore send errors - it's OK if no one is listening
            let _ = self.state_tx.send(change.clone());
        }

        changes
    }

    /// Subscribe to state change events
    ///
    /// Returns a receiver that will get notified of all future state changes.
    /// Multiple subscribers can listen simultaneously.
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.state_tx.subscribe()
    }

    /// Detect what changed between two states and generate events
    ///
    /// This is called internally by `update()` to determine which events to emit.
    fn detect_changes(&self, old: &AppState, new: &AppState) -> Vec<StateChange> {
        let mut changes = Vec::new();

        if old.is_configured != new.is_configured || old.module_count != new.module_count {
            changes.push(StateChange::ConfigurationChanged {
                is_configured: new.is_configured,
                module_count: new.module_count,
            });
        }

        if old.selected_module != new.selected_module {
            changes.push(StateChange::SelectionChanged {
                module: new.selected_module.clone(),
            });
        }

        if old.is_generating != new.is_generating {
            if new.is_generating {
                changes.push(StateChange::GenerationStarted);
            } else if let Some(message) = &new.last_error {
                changes.push(StateChange::GenerationFailed {
                    message: message.clone(),
                });
            } else if let Some(path) = &new.last_generated {
                changes.push(StateChange::GenerationFinished { path: path.clone() });
            }
        }

        if old.current_operation != new.current_operation {
            changes.push(StateChange::OperationChanged {
                operation: new.current_operation.clone(),
            });
        }

        changes
    }

    // Convenience methods for common state updates

    /// Populate state from a loaded configuration
    pub fn load_from_config(&self, config: &Configuration) -> Vec<StateChange> {
        self.update(|state| {
            state.student_name = config.student.name.clone();
            state.student_id = config.student.id.clone();
            state.module_count = config.modules.len();
            state.is_configured = !config.student.name.is_empty()
                && !config.student.id.is_empty()
                && !config.modules.is_empty();

            tracing::info!(
                "Loaded configuration: configured={}, modules={}",
                state.is_configured,
                state.module_count
            );
        })
    }

    /// Select the module to generate sheets for
    pub fn select_module(&self, code: Option<String>) -> Vec<StateChange> {
        self.update(|state| {
            state.selected_module = code;
        })
    }

    /// Atomically claim the generation slot
    ///
    /// Returns the emitted events if the slot was free, or `None` if a
    /// generation task is already running. The check and the flag flip
    /// happen under a single write lock, so two racing callers cannot
    /// both succeed.
    pub fn try_start_generation(&self, operation: String) -> Option<Vec<StateChange>> {
        let mut state = self.state.write().unwrap();
        if state.is_generating {
            return None;
        }

        let old_state = state.clone();
        state.is_generating = true;
        state.current_operation = operation;
        state.last_generated = None;
        state.last_error = None;

        let changes = self.detect_changes(&old_state, &state);
        for change in &changes {
            let _ = self.state_tx.send(change.clone());
        }
        Some(changes)
    }

    /// Mark a generation task as started
    pub fn start_generation(&self, operation: String) -> Vec<StateChange> {
        self.update(|state| {
            state.is_generating = true;
            state.current_operation = operation;
            state.last_generated = None;
            state.last_error = None;
        })
    }

    /// Mark the running generation task as completed
    ///
    /// The terminal event is always delivered, even when the generating flag
    /// was already cleared (a reset can race the worker), so every started
    /// task produces exactly one finished or failed event.
    pub fn finish_generation(&self, path: Utf8PathBuf) -> Vec<StateChange> {
        let mut changes = self.update(|state| {
            state.is_generating = false;
            state.current_operation.clear();
            state.sheets_generated += 1;
            state.last_generated = Some(path.clone());
            state.last_error = None;
        });

        let finished = StateChange::GenerationFinished { path };
        if !changes.contains(&finished) {
            let _ = self.state_tx.send(finished.clone());
            changes.push(finished);
        }

        changes
    }

    /// Mark the running generation task as failed
    ///
    /// As with [`finish_generation`](Self::finish_generation), the terminal
    /// event is delivered unconditionally.
    pub fn fail_generation(&self, message: String) -> Vec<StateChange> {
        let mut changes = self.update(|state| {
            state.is_generating = false;
            state.current_operation.clear();
            state.last_error = Some(message.clone());
        });

        let failed = StateChange::GenerationFailed { message };
        if !changes.contains(&failed) {
            let _ = self.state_tx.send(failed.clone());
            changes.push(failed);
        }

        changes
    }

    /// Reset all generation-related state
    pub fn reset_generation_state(&self) -> Vec<StateChange> {
        let mut changes = self.update(|state| {
            state.reset_generation_state();
        });

        let reset_event = StateChange::StateReset;
        let _ = self.state_tx.send(reset_event.clone());
        changes.push(reset_event);

        changes
    }

    /// Get an Arc reference to the state for use in worker threads
    ///
    /// Use this when you need to share state across threads but want
    /// to minimize cloning. Remember to use read/write locks appropriately.
    pub fn state_arc(&self) -> Arc<RwLock<AppState>> {
        Arc::clone(&self.state)
    }
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

// Make StateManager cloneable for sharing across threads
impl Clone for StateManager {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            state_tx: self.state_tx.clone(),
        }
    }
}
