//! Command dispatch: resolve, expand, bind and execute.
//!
//! One dispatch moves through these stages:
//! - **Resolve**: the first token names a built-in editor or, failing that, a macro.
//!   Built-ins win when both exist.
//! - **Expand**: a macro is replaced by its stored chain. Trailing arguments from
//!   the command line overlay the literal arguments of the chain's last step.
//! - **Bind and execute**: each step gets a fresh editor, binds its arguments,
//!   validates them and edits the buffer. The first failure stops the chain;
//!   steps already applied stay applied.
//! - **Done / failed**: the caller gets the buffer and every response raised,
//!   or a [`Failure`] carrying the same plus the step and reason.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::editor::{EditError, Edited, ParameterError, Registry, ResponseKind};
use crate::macros::{Macro, MacroError, MacroStore};
use crate::tokenizer::{TokenizeError, tokenize};

/// Why a dispatch stopped.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("malformed command: {0}")]
    Malformed(#[from] TokenizeError),
    #[error("empty command")]
    EmptyCommand,
    #[error("unknown command {name:?}")]
    UnknownCommand { name: String },
    #[error("cannot look up {name:?}: {source}")]
    Config {
        name: String,
        #[source]
        source: MacroError,
    },
    #[error("{editor}: {source}")]
    Validation {
        editor: String,
        #[source]
        source: ParameterError,
    },
    #[error("{editor}: {source}")]
    Edit {
        editor: String,
        #[source]
        source: EditError,
    },
}

/// One resolved editor call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    /// Canonical editor name.
    pub name: String,
    /// Positional arguments, without the editor name.
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// The argv form editors bind from: the name followed by the arguments.
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.name.clone())
            .chain(self.args.iter().cloned())
            .collect()
    }
}

/// A message raised by one step of a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    pub kind: ResponseKind,
    pub message: String,
    /// 1-based position of the step in the executed chain.
    pub step: usize,
}

/// A completed dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub text: String,
    pub responses: Vec<Response>,
    /// The chain that ran, in order.
    pub steps: Vec<Invocation>,
}

impl Outcome {
    /// Whether any step asked the host to stay interactive.
    pub fn stays_open(&self) -> bool {
        self.responses
            .iter()
            .any(|r| r.kind == ResponseKind::Persistent)
    }
}

/// A dispatch that stopped early.
///
/// `text` is the buffer as left by the steps that completed before `step`.
/// Serializes with `error` as its display message.
#[derive(Debug, Serialize)]
pub struct Failure {
    #[serde(serialize_with = "serialize_message")]
    pub error: DispatchError,
    /// 1-based step that failed, or `None` if no chain was formed.
    pub step: Option<usize>,
    pub text: String,
    pub responses: Vec<Response>,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.step {
            Some(step) => write!(f, "step {step}: {}", self.error),
            None => write!(f, "{}", self.error),
        }
    }
}

fn serialize_message<S: serde::Serializer>(
    error: &DispatchError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

impl std::error::Error for Failure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// An error tied to the chain position it happened at.
struct StepError {
    step: Option<usize>,
    error: DispatchError,
}

impl StepError {
    const fn command(error: DispatchError) -> Self {
        Self { step: None, error }
    }

    const fn at(step: usize, error: DispatchError) -> Self {
        Self {
            step: Some(step),
            error,
        }
    }

    fn into_failure(self, text: String, responses: Vec<Response>) -> Failure {
        Failure {
            error: self.error,
            step: self.step,
            text,
            responses,
        }
    }
}

/// Resolves and runs commands against the built-in registry and macro store.
///
/// Holds no per-dispatch state, so one dispatcher can serve concurrent callers
/// as long as each brings its own buffer.
#[derive(Debug)]
pub struct Dispatcher {
    registry: Registry,
    macros: Result<MacroStore, MacroError>,
}

impl Dispatcher {
    /// Build a dispatcher. A macro store that failed to load is kept as its
    /// error and reported only when a command needs a macro.
    pub fn new(registry: Registry, macros: Result<MacroStore, MacroError>) -> Self {
        let dispatcher = Self { registry, macros };
        for name in dispatcher.shadowed_macros() {
            tracing::warn!("Macro {name:?} is shadowed by the built-in editor of the same name");
        }
        dispatcher
    }

    /// Built-ins only, with an empty macro store.
    pub fn builtin() -> Self {
        Self::new(Registry::builtin(), Ok(MacroStore::default()))
    }

    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    pub const fn macros(&self) -> Result<&MacroStore, &MacroError> {
        self.macros.as_ref()
    }

    /// Macros whose names are taken by a built-in and therefore never run.
    pub fn shadowed_macros(&self) -> Vec<&str> {
        self.macros
            .as_ref()
            .map(|store| {
                store
                    .names()
                    .into_iter()
                    .filter(|name| self.registry.contains(name))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Tokenize `command` and run it over `text`.
    ///
    /// # Errors
    ///
    /// Returns a [`Failure`] for a malformed or unknown command, an unavailable
    /// macro store, or a step that fails validation or editing.
    pub fn dispatch(&self, command: &str, text: String) -> Result<Outcome, Failure> {
        match tokenize(command) {
            Ok(tokens) => self.dispatch_tokens(&tokens, text),
            Err(e) => Err(StepError::command(e.into()).into_failure(text, Vec::new())),
        }
    }

    /// Run already-split tokens over `text`.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::dispatch`].
    pub fn dispatch_tokens<S: AsRef<str>>(
        &self,
        tokens: &[S],
        text: String,
    ) -> Result<Outcome, Failure> {
        match self.expand(tokens) {
            Ok(chain) => self.execute(chain, text),
            Err(e) => Err(e.into_failure(text, Vec::new())),
        }
    }

    /// Resolve the command name and build the chain of invocations to run.
    fn expand<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<Invocation>, StepError> {
        let Some((name, rest)) = tokens.split_first() else {
            return Err(StepError::command(DispatchError::EmptyCommand));
        };
        let name = name.as_ref();
        let args: Vec<String> = rest.iter().map(|a| a.as_ref().to_string()).collect();

        if let Some(editor) = self.registry.create(name) {
            return Ok(vec![Invocation::new(editor.name(), args)]);
        }

        let store = self.macros.as_ref().map_err(|source| {
            StepError::command(DispatchError::Config {
                name: name.to_string(),
                source: source.clone(),
            })
        })?;
        let Some(user_macro) = store.resolve(name) else {
            return Err(StepError::command(DispatchError::UnknownCommand {
                name: name.to_string(),
            }));
        };
        self.expand_macro(user_macro, &args)
    }

    fn expand_macro(
        &self,
        user_macro: &Macro,
        trailing: &[String],
    ) -> Result<Vec<Invocation>, StepError> {
        let lines: Vec<&str> = user_macro
            .steps
            .iter()
            .map(String::as_str)
            .filter(|line| !line.trim().is_empty())
            .collect();
        let Some(last) = lines.len().checked_sub(1) else {
            return Err(StepError::command(DispatchError::EmptyCommand));
        };

        let mut chain = Vec::with_capacity(lines.len());
        for (i, line) in lines.iter().enumerate() {
            let step = i + 1;
            let tokens = tokenize(line).map_err(|e| StepError::at(step, e.into()))?;
            let Some((name, literal)) = tokens.split_first() else {
                return Err(StepError::at(step, DispatchError::EmptyCommand));
            };
            // Macro steps name built-ins only; macros do not nest.
            let Some(editor) = self.registry.create(name) else {
                return Err(StepError::at(
                    step,
                    DispatchError::UnknownCommand { name: name.clone() },
                ));
            };
            let mut args = literal.to_vec();
            if i == last {
                overlay(&mut args, trailing);
            }
            chain.push(Invocation::new(editor.name(), args));
        }
        tracing::debug!(
            "Expanded macro {} into {} steps",
            user_macro.name,
            chain.len()
        );
        Ok(chain)
    }

    fn execute(&self, chain: Vec<Invocation>, mut text: String) -> Result<Outcome, Failure> {
        let mut responses = Vec::new();
        for (i, invocation) in chain.iter().enumerate() {
            let step = i + 1;
            let edited = match self.run_step(invocation, &text) {
                Ok(edited) => edited,
                Err(error) => {
                    return Err(StepError::at(step, error).into_failure(text, responses));
                }
            };
            text = edited.text;
            if let Some(notice) = edited.notice {
                responses.push(Response {
                    kind: notice.kind,
                    message: notice.message,
                    step,
                });
            }
        }
        tracing::info!(
            "Dispatch finished: {} steps, {} responses",
            chain.len(),
            responses.len()
        );
        Ok(Outcome {
            text,
            responses,
            steps: chain,
        })
    }

    /// Instantiate a fresh editor, bind and validate its arguments, then edit.
    fn run_step(&self, invocation: &Invocation, text: &str) -> Result<Edited, DispatchError> {
        let mut editor =
            self.registry
                .create(&invocation.name)
                .ok_or_else(|| DispatchError::UnknownCommand {
                    name: invocation.name.clone(),
                })?;
        let editor_name = editor.name();

        editor.define_parameters();
        let ignored = editor.set_parameters(&invocation.argv());
        if ignored > 0 {
            tracing::warn!("{editor_name}: ignoring {ignored} extra argument(s)");
        }
        tracing::debug!("Running {editor_name} with {:?}", invocation.args);

        editor
            .validate()
            .map_err(|source| DispatchError::Validation {
                editor: editor_name.to_string(),
                source,
            })?;

        editor.edit(text).map_err(|source| match source {
            EditError::Parameter(source) => DispatchError::Validation {
                editor: editor_name.to_string(),
                source,
            },
            source => DispatchError::Edit {
                editor: editor_name.to_string(),
                source,
            },
        })
    }
}

/// Argument `i` of `trailing` replaces argument `i` of `args`; extras append.
fn overlay(args: &mut Vec<String>, trailing: &[String]) {
    for (i, value) in trailing.iter().enumerate() {
        match args.get_mut(i) {
            Some(slot) => slot.clone_from(value),
            None => args.push(value.clone()),
        }
    }
}
