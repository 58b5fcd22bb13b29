// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. editor::EditError)
    clippy::module_name_repetitions
)]

//! # Clipline
//!
//! A text-transformation pipeline for the clipboard.
//!
//! A command line such as `columnAlign 3 ,` names an editor and its
//! arguments. Clipline resolves the name to a built-in editor or to a
//! user-defined macro (a fixed chain of editor invocations), binds and
//! validates the arguments, and runs every step over the text in order.
//!
//! ## Modules
//!
//! - [`tokenizer`]: Splits command lines into tokens
//! - [`editor`]: The editor contract, parameters and built-in editors
//! - [`macros`]: User-defined macro store
//! - [`dispatch`]: Resolves, expands and executes commands
//! - [`config`]: Saved defaults and macro file location

pub mod config;
pub mod dispatch;
pub mod editor;
pub mod macros;
pub mod tokenizer;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::dispatch::{DispatchError, Dispatcher, Failure, Outcome, Response};
    pub use crate::editor::{ClipEditor, Registry, ResponseKind};
    pub use crate::macros::{MacroError, MacroStore};
}
