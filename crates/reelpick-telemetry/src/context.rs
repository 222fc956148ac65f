//! Per-invocation trace context.
//!
//! # Design
//! - Each command invocation gets a random trace id kept in task-local storage.
//! - The invocation span carries the id, command and build SHA so every event
//!   emitted underneath can be correlated.

use std::future::Future;
use std::sync::Arc;

use tracing::{Instrument, Span};
use uuid::Uuid;

use crate::init::build_sha;

/// Generate a fresh trace identifier.
#[must_use]
pub fn new_trace_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span describing one command invocation.
#[must_use]
pub fn invocation_span(trace_id: &str, command: &str) -> Span {
    tracing::info_span!(
        "invocation",
        trace_id = %trace_id,
        command = %command,
        build_sha = %build_sha()
    )
}

/// Trace id of the invocation running on the current task, if any.
#[must_use]
pub fn current_trace_id() -> Option<String> {
    ACTIVE_INVOCATION
        .try_with(|ctx| ctx.trace_id.as_ref().to_string())
        .ok()
}

/// Command name of the invocation running on the current task, if any.
#[must_use]
pub fn current_command() -> Option<String> {
    ACTIVE_INVOCATION
        .try_with(|ctx| ctx.command.as_ref().to_string())
        .ok()
}

/// Run `fut` inside an invocation span with its trace context available.
pub async fn with_invocation_context<Fut, T>(
    trace_id: impl Into<String>,
    command: impl Into<String>,
    fut: Fut,
) -> T
where
    Fut: Future<Output = T>,
{
    let context = InvocationContext {
        trace_id: Arc::from(trace_id.into()),
        command: Arc::from(command.into()),
    };
    let span = invocation_span(&context.trace_id, &context.command);
    ACTIVE_INVOCATION
        .scope(context, fut.instrument(span))
        .await
}

#[derive(Clone)]
struct InvocationContext {
    trace_id: Arc<str>,
    command: Arc<str>,
}

tokio::task_local! {
    static ACTIVE_INVOCATION: InvocationContext;
}
