//! Built-in text transformations ("editors").
//!
//! Every editor implements [`ClipEditor`]: it declares an ordered list of
//! [`Parameter`]s, accepts positional arguments for them, and produces a new
//! text buffer from the one it is shown.

mod case;
mod column_align;
mod count;
mod parameter;
mod registry;
mod replace;
mod sort;
mod trim;

pub use case::{Lower, Upper};
pub use column_align::ColumnAlign;
pub use count::Count;
pub use parameter::{
    Parameter, ParameterError, ParameterList, Validator, is_non_negative_i16, is_one_of,
    is_splitting_pattern,
};
pub use registry::{EditorFactory, Registry};
pub use replace::Replace;
pub use sort::Sort;
pub use trim::Trim;

use serde::Serialize;
use thiserror::Error;

/// Whether a response lets the host carry on or asks it to stay interactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    Transient,
    Persistent,
}

/// A message an editor raises while editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: ResponseKind,
    pub message: String,
}

impl Notice {
    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            kind: ResponseKind::Transient,
            message: message.into(),
        }
    }

    pub fn persistent(message: impl Into<String>) -> Self {
        Self {
            kind: ResponseKind::Persistent,
            message: message.into(),
        }
    }
}

/// The buffer after an edit, plus the editor's response if it raised one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edited {
    pub text: String,
    pub notice: Option<Notice>,
}

impl Edited {
    pub const fn quiet(text: String) -> Self {
        Self { text, notice: None }
    }

    pub const fn with_notice(text: String, notice: Notice) -> Self {
        Self {
            text,
            notice: Some(notice),
        }
    }
}

/// Why an edit could not run.
#[derive(Debug, Error)]
pub enum EditError {
    #[error(transparent)]
    Parameter(#[from] ParameterError),
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("{0}")]
    Failed(String),
}

/// The contract every transformation satisfies.
///
/// A fresh instance is created for each invocation, so implementations hold
/// no state beyond their parameter list.
pub trait ClipEditor {
    /// Lookup key, matched case-insensitively.
    fn name(&self) -> &'static str;

    fn short_description(&self) -> &'static str;

    fn long_description(&self) -> &'static str;

    /// Populate the declared parameters, discarding any bound values.
    fn define_parameters(&mut self);

    fn parameters(&self) -> &ParameterList;

    fn parameters_mut(&mut self) -> &mut ParameterList;

    /// Bind an argv-style list. The first entry is the editor's own name and
    /// is skipped. Returns how many arguments did not fit the declared list.
    fn set_parameters(&mut self, args: &[String]) -> usize {
        let values = args.get(1..).unwrap_or_default();
        self.parameters_mut().bind(values)
    }

    /// Bind the next unbound parameter. Returns `false` when all are bound.
    fn set_next_parameter(&mut self, arg: &str) -> bool {
        self.parameters_mut().push_value(arg)
    }

    /// Check every parameter against its validator.
    ///
    /// # Errors
    ///
    /// Returns the first parameter that is missing or invalid.
    fn validate(&self) -> Result<(), ParameterError> {
        self.parameters().validate()
    }

    /// Transform `source`, returning the new text. The caller keeps `source`,
    /// so a failed edit leaves the buffer as it was.
    ///
    /// # Errors
    ///
    /// Fails with [`EditError::Parameter`] if a bound parameter does not satisfy
    /// its validator, or with an editor-specific error.
    fn edit(&mut self, source: &str) -> Result<Edited, EditError>;
}

/// Run an editor over `input` with positional `args` (without the editor
/// name), the way a single-step dispatch does.
///
/// # Errors
///
/// Returns whatever validation or editing error the editor reports.
pub fn run_editor<S: AsRef<str>>(
    editor: &mut dyn ClipEditor,
    input: &str,
    args: &[S],
) -> Result<Edited, EditError> {
    editor.define_parameters();
    for arg in args {
        editor.set_next_parameter(arg.as_ref());
    }
    editor.validate()?;
    editor.edit(input)
}

/// Split on `\n`, apply `f` to every line and rejoin.
pub(crate) fn map_lines(source: &str, f: impl Fn(&str) -> String) -> String {
    source.split('\n').map(f).collect::<Vec<_>>().join("\n")
}
