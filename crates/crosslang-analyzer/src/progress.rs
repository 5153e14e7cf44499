//! Work-done progress for navigation requests.
//!
//! Cross-language lookups can take a noticeable moment while sibling files
//! are scanned, so each request shows up in the editor's activity indicator
//! until it finishes.

use std::{
    panic::AssertUnwindSafe,
    sync::atomic::{AtomicU64, Ordering},
};

use futures::FutureExt;
use tower_lsp::{Client, lsp_types::*};
use tracing::{debug, warn};

static NEXT_PROGRESS_ID: AtomicU64 = AtomicU64::new(1);
const PROGRESS_TITLE_PREFIX: &str = "crosslang-analyzer:";

/// An active `$/progress` session.
///
/// Dropping the token without calling [`end`](Self::end) still closes the
/// session, with a "Cancelled" message.
pub struct ProgressToken {
    client: Option<Client>,
    token: Option<NumberOrString>,
}

impl ProgressToken {
    /// Create the token on the client and send `Begin`.
    ///
    /// The create request runs in the background; editors that reject it
    /// generally still render the notifications.
    pub async fn begin(
        client: &Client,
        title: &str,
        message: Option<String>,
    ) -> Self {
        let id = NEXT_PROGRESS_ID.fetch_add(1, Ordering::Relaxed);
        let token = NumberOrString::String(format!("crosslangAnalyzer/{title}/{id}"));
        let display_title = prefixed_progress_title(title);

        let create_client = client.clone();
        let create_token = token.clone();
        tokio::spawn(async move {
            let params = WorkDoneProgressCreateParams {
                token: create_token,
            };
            let created = AssertUnwindSafe(create_client.send_request::<request::WorkDoneProgressCreate>(params))
                .catch_unwind()
                .await;
            match created {
                Ok(Ok(())) => {},
                Ok(Err(error)) => debug!("workDoneProgress/create rejected: {error}"),
                Err(_) => warn!("workDoneProgress/create panicked (client may have disconnected)"),
            }
        });

        let begin = WorkDoneProgress::Begin(WorkDoneProgressBegin {
            title: display_title.clone(),
            cancellable: Some(false),
            message,
            percentage: None,
        });
        if !send_progress(client, token.clone(), begin).await {
            warn!("progress begin for '{display_title}' could not be delivered");
            return Self {
                client: None,
                token: None,
            };
        }
        debug!("progress begin: {display_title}");

        Self {
            client: Some(client.clone()),
            token: Some(token),
        }
    }

    pub async fn end(
        mut self,
        message: Option<String>,
    ) {
        let (Some(client), Some(token)) = (self.client.take(), self.token.take()) else {
            return;
        };
        debug!("progress end: {token:?}");
        send_progress(&client, token, end_value(message)).await;
    }
}

impl Drop for ProgressToken {
    fn drop(&mut self) {
        if let (Some(client), Some(token)) = (self.client.take(), self.token.take()) {
            debug!("progress dropped before end: {token:?}");
            tokio::spawn(async move {
                send_progress(&client, token, end_value(Some("Cancelled".to_string()))).await;
            });
        }
    }
}

fn end_value(message: Option<String>) -> WorkDoneProgress {
    WorkDoneProgress::End(WorkDoneProgressEnd {
        message,
    })
}

/// `false` when sending panicked, which happens once the client is gone.
async fn send_progress(
    client: &Client,
    token: NumberOrString,
    value: WorkDoneProgress,
) -> bool {
    AssertUnwindSafe(client.send_notification::<notification::Progress>(ProgressParams {
        token,
        value: ProgressParamsValue::WorkDone(value),
    }))
    .catch_unwind()
    .await
    .is_ok()
}

fn prefixed_progress_title(title: &str) -> String {
    let trimmed = title.trim();
    if trimmed.starts_with(PROGRESS_TITLE_PREFIX) {
        return trimmed.to_owned();
    }
    format!("{PROGRESS_TITLE_PREFIX} {trimmed}")
}

#[cfg(test)]
#[path = "../tests/src/progress_tests.rs"]
mod tests;
