//! File pipeline.
//!
//! A pipeline runs each file through a stack of middleware. Every middleware
//! receives the file and a one-shot continuation; calling `next.run()` hands
//! the file to the rest of the stack. A middleware that drops `next` without
//! running it halts the file there.

use std::cell::Cell;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// A file travelling through a pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    /// Identifying path of the file.
    pub path: PathBuf,
    /// File contents, when loaded.
    #[serde(default)]
    pub contents: Option<String>,
    /// Arbitrary per-file data (front matter, stats, ...).
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl File {
    /// Create a file with only a path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            contents: None,
            data: Map::new(),
        }
    }

    /// Set the contents.
    pub fn with_contents(mut self, contents: impl Into<String>) -> Self {
        self.contents = Some(contents.into());
        self
    }

    /// Set a data field.
    pub fn with_data(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// The identifying path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The identifying path as a JSON string value.
    pub fn path_value(&self) -> Value {
        Value::String(self.path.to_string_lossy().into_owned())
    }
}

/// One-shot continuation handed to each middleware.
pub struct Next<'a> {
    inner: Box<dyn FnOnce() + 'a>,
}

impl<'a> Next<'a> {
    /// Wrap a continuation.
    pub fn new(f: impl FnOnce() + 'a) -> Self {
        Self { inner: Box::new(f) }
    }

    /// A continuation that does nothing.
    pub fn noop() -> Self {
        Self::new(|| {})
    }

    /// Continue the pipeline.
    pub fn run(self) {
        (self.inner)();
    }
}

impl std::fmt::Debug for Next<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Next")
    }
}

/// A per-file pipeline step.
pub trait Middleware: Send + Sync {
    /// Handle `file`, then call `next.run()` to continue.
    fn handle(&self, file: &File, next: Next<'_>);
}

impl<F> Middleware for F
where
    F: Fn(&File, Next<'_>) + Send + Sync,
{
    fn handle(&self, file: &File, next: Next<'_>) {
        self(file, next);
    }
}

/// Boxed middleware.
pub type BoxMiddleware = Box<dyn Middleware>;

/// Box a closure as middleware.
pub fn from_fn<F>(f: F) -> BoxMiddleware
where
    F: Fn(&File, Next<'_>) + Send + Sync + 'static,
{
    Box::new(f)
}

/// Counts from a pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineSummary {
    /// Files handed to the pipeline.
    pub processed: usize,
    /// Files that passed through every middleware.
    pub completed: usize,
    /// Files stopped by a middleware that did not continue.
    pub halted: usize,
}

/// Ordered stack of middleware.
#[derive(Default)]
pub struct Pipeline {
    stack: Vec<BoxMiddleware>,
}

impl Pipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an already boxed middleware.
    pub fn push(&mut self, middleware: BoxMiddleware) -> &mut Self {
        self.stack.push(middleware);
        self
    }

    /// Number of middleware in the stack.
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Whether the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Run one file through the stack. Returns whether it reached the end.
    pub fn process(&self, file: &File) -> bool {
        let completed = Cell::new(false);
        dispatch(&self.stack, file, &completed);

        if !completed.get() {
            debug!(path = %file.path.display(), "file halted by middleware");
        }
        completed.get()
    }

    /// Run every file through the stack, in order.
    pub fn run(&self, files: impl IntoIterator<Item = File>) -> PipelineSummary {
        let mut summary = PipelineSummary::default();
        for file in files {
            summary.processed += 1;
            if self.process(&file) {
                summary.completed += 1;
            } else {
                summary.halted += 1;
            }
        }

        debug!(
            processed = summary.processed,
            completed = summary.completed,
            halted = summary.halted,
            "pipeline run complete"
        );
        summary
    }
}

fn dispatch(stack: &[BoxMiddleware], file: &File, completed: &Cell<bool>) {
    match stack.split_first() {
        None => completed.set(true),
        Some((first, rest)) => {
            first.handle(file, Next::new(move || dispatch(rest, file, completed)));
        }
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("middleware", &self.stack.len())
            .finish()
    }
}
