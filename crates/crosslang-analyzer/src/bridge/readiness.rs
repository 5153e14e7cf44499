//! Waiting for a language service to finish loading documents.
//!
//! Some analyzers only produce complete symbol trees a while after a file is
//! opened. Rather than sleeping for a fixed time, the engine polls the symbol
//! count of the files it is about to scan and proceeds once two consecutive
//! polls agree or the wait budget runs out. This is best effort: a service
//! that stalls between polls can still be observed mid-indexing.

use std::time::Duration;

use tokio::time::Instant;
use tower_lsp::lsp_types::Url;
use tracing::{debug, warn};

use crate::bridge::source::SymbolSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPolicy {
    pub poll_interval: Duration,
    pub max_wait: Duration,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            max_wait: Duration::from_millis(1500),
        }
    }
}

pub async fn wait_until_ready<S: SymbolSource + ?Sized>(
    source: &S,
    files: &[Url],
    policy: ReadinessPolicy,
) {
    for file in files {
        if let Err(error) = source.open_document(file).await {
            warn!("[readiness] opening {file} failed: {error}");
        }
    }

    let mut pending = Vec::new();
    for file in files {
        if !source.is_ready(file).await {
            pending.push(file);
        }
    }
    if pending.is_empty() {
        return;
    }

    let deadline = Instant::now() + policy.max_wait;
    let mut previous_count: Option<usize> = None;
    let mut polls = 0usize;
    loop {
        polls += 1;
        let mut count = 0usize;
        for file in &pending {
            match source.document_symbols(file).await {
                Ok(symbols) => count += symbols.len(),
                Err(error) => warn!("[readiness] polling {file} failed: {error}"),
            }
        }

        if previous_count == Some(count) {
            debug!("[readiness] {} file(s) stable at {count} symbol(s) after {polls} poll(s)", pending.len());
            return;
        }
        previous_count = Some(count);

        if Instant::now() >= deadline {
            debug!("[readiness] giving up after {polls} poll(s); proceeding with {count} symbol(s)");
            return;
        }
        tokio::time::sleep(policy.poll_interval).await;
    }
}

#[cfg(test)]
#[path = "../../tests/src/bridge/readiness_tests.rs"]
mod tests;
