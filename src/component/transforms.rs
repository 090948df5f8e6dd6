//! Transform pipeline infrastructure
//!
//! Compilation passes are [`Runnable`] stages composed into [`Transform`]s. The
//! [`Pipeline`] exposes two named extension points that extensions register stages on:
//!
//! - `after-parse-node` runs once per node as soon as the parser completes it (children
//!   first), and may restructure the node.
//! - `before-emit-output` runs once per compiled unit on the generated script text.
//!
//! Stages on one extension point run in registration order, composed with
//! [`Transform::then`]. There is no global registry: the set of stages is whatever the
//! extensions passed to the compiler installed.

use std::fmt;

use super::ast::Node;
use super::compiler::CompiledOutput;

/// Failure of a pipeline stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    Error(String),
    /// Raised by a stage registered on an extension point, tagged with its name
    StageFailed { stage: String, message: String },
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformError::Error(message) => f.write_str(message),
            TransformError::StageFailed { stage, message } => {
                write!(f, "Stage '{}' failed: {}", stage, message)
            }
        }
    }
}

impl std::error::Error for TransformError {}

impl From<String> for TransformError {
    fn from(message: String) -> Self {
        TransformError::Error(message)
    }
}

impl From<&str> for TransformError {
    fn from(message: &str) -> Self {
        message.to_string().into()
    }
}

/// A single pass from `I` to `O`
pub trait Runnable<I, O> {
    fn run(&self, input: I) -> Result<O, TransformError>;
}

type StageFn<I, O> = dyn Fn(I) -> Result<O, TransformError> + Send + Sync;

/// Stages fused into one callable
pub struct Transform<I, O> {
    stage: Box<StageFn<I, O>>,
}

impl<I, O> Transform<I, O> {
    pub fn from_fn<F>(stage: F) -> Self
    where
        F: Fn(I) -> Result<O, TransformError> + Send + Sync + 'static,
    {
        Transform {
            stage: Box::new(stage),
        }
    }

    /// Feeds this transform's output into `next`
    pub fn then<O2, S>(self, next: S) -> Transform<I, O2>
    where
        S: Runnable<O, O2> + Send + Sync + 'static,
        I: 'static,
        O: 'static,
        O2: 'static,
    {
        let first = self.stage;
        Transform::from_fn(move |input| next.run(first(input)?))
    }

    pub fn run(&self, input: I) -> Result<O, TransformError> {
        (self.stage)(input)
    }
}

impl<I: 'static, O: 'static> Runnable<I, O> for Transform<I, O> {
    fn run(&self, input: I) -> Result<O, TransformError> {
        Transform::run(self, input)
    }
}

/// A named hook that applies its registered stages in order
pub struct ExtensionPoint<T> {
    name: &'static str,
    stages: Vec<String>,
    transform: Transform<T, T>,
}

impl<T: 'static> ExtensionPoint<T> {
    pub fn new(name: &'static str) -> Self {
        ExtensionPoint {
            name,
            stages: Vec::new(),
            transform: Transform::from_fn(Ok),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Names of the registered stages, in the order they run
    pub fn stages(&self) -> &[String] {
        &self.stages
    }

    /// Append a stage. Failures are reported as `StageFailed` with the stage name.
    pub fn register<S>(&mut self, stage_name: impl Into<String>, stage: S)
    where
        S: Runnable<T, T> + Send + Sync + 'static,
    {
        let stage_name = stage_name.into();
        let named = Named {
            name: stage_name.clone(),
            stage,
        };
        let current = std::mem::replace(&mut self.transform, Transform::from_fn(Ok));
        self.transform = current.then(named);
        self.stages.push(stage_name);
    }

    pub fn run(&self, input: T) -> Result<T, TransformError> {
        self.transform.run(input)
    }
}

struct Named<S> {
    name: String,
    stage: S,
}

impl<T, S: Runnable<T, T>> Runnable<T, T> for Named<S> {
    fn run(&self, input: T) -> Result<T, TransformError> {
        self.stage.run(input).map_err(|err| match err {
            TransformError::StageFailed { .. } => err,
            TransformError::Error(message) => TransformError::StageFailed {
                stage: self.name.clone(),
                message,
            },
        })
    }
}

/// The extension points of one compiler
pub struct Pipeline {
    pub after_parse_node: ExtensionPoint<Node>,
    pub before_emit_output: ExtensionPoint<CompiledOutput>,
}

impl Pipeline {
    pub fn new() -> Self {
        Pipeline {
            after_parse_node: ExtensionPoint::new("after-parse-node"),
            before_emit_output: ExtensionPoint::new("before-emit-output"),
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
