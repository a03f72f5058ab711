//! Services module - Pure business logic for lab sheet generation.
//!
//! This module contains the core document generation logic. The services are
//! **framework-agnostic** and have no dependencies on the UI layer, making
//! them testable and reusable.
//!
//! # Components
//!
//! - [`SheetGenerator`]: Builds a lab sheet document for a module and writes
//!   it to the resolved output directory. Handles:
//!   - Naming files as `<Term>_<Code>_<NN>.docx`
//!   - Collision-free naming (a numeric suffix is appended, existing files
//!     are never overwritten)
//!   - Document layout: optional logo, centered module title, sheet label,
//!     student line, separator rule
//!
//! - [`GenerationDispatcher`]: Runs generation on the tokio blocking pool so
//!   callers stay responsive, publishing completion and failure through the
//!   [`StateManager`](crate::state::StateManager) event channel. Enforces a
//!   single in-flight task.
//!
//! # Design Philosophy
//!
//! The services layer is designed to be:
//! - **Pure**: No side effects beyond file I/O
//! - **Testable**: No hidden dependencies, all inputs are explicit parameters
//! - **Framework-agnostic**: No GUI code, only business logic
//!
//! # Usage Example
//!
//! ```ignore
//! use labsheetgen::services::{GenerationRequest, SheetGenerator};
//!
//! let request = GenerationRequest {
//!     student,
//!     module,
//!     sheet_number: 1,
//!     output_dir,
//!     logo_path: None,
//! };
//!
//! let path = SheetGenerator::new().generate(&request)?;
//! ```

pub mod dispatch;
pub mod generator;

pub use dispatch::GenerationDispatcher;
pub use generator::{GenerationError, GenerationRequest, SheetGenerator};
