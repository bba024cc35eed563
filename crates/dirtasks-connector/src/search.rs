//! Paginated search driver
//!
//! Drives the RFC 2696 paged-results exchange against a [`DirectoryClient`]:
//! request a page, coerce its entries, carry the server cookie into the next
//! request, and stop on an empty or absent cookie.
//!
//! Cancellation is cooperative. The token is checked before every request
//! (including the first) and raced against each in-flight page request, so
//! a cancelled search never issues another request and never reports
//! partial results.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::coerce::coerce_entry;
use crate::config::ConnectionConfig;
use crate::error::{ConnectorError, ConnectorResult};
use crate::operation::{DirectoryEntry, PageCursor, PageRequest, SearchRequestSpec};
use crate::outcome::SearchOutcome;
use crate::session::Session;
use crate::traits::DirectoryClient;

/// Run a full paginated search and assemble the outcome.
///
/// Returns `Err` for configuration and contract errors and for
/// cancellation; runtime failures become a failed [`SearchOutcome`].
pub async fn search_objects<C: DirectoryClient>(
    client: C,
    config: &ConnectionConfig,
    spec: &SearchRequestSpec,
    cancel: &CancellationToken,
) -> ConnectorResult<SearchOutcome> {
    SearchOutcome::assemble(run_search(client, config, spec, cancel).await)
}

/// Connect, bind, drain every page and release the connection.
///
/// The connection is released on every exit path once established.
#[instrument(skip_all, fields(host = %config.host, base = %spec.search_base, scope = %spec.scope))]
pub async fn run_search<C: DirectoryClient>(
    client: C,
    config: &ConnectionConfig,
    spec: &SearchRequestSpec,
    cancel: &CancellationToken,
) -> ConnectorResult<Vec<DirectoryEntry>> {
    config.validate()?;
    spec.validate()?;
    check_cancelled(cancel)?;

    let mut session = Session::establish(client, config).await?;
    let result = drain_pages(session.client_mut(), spec, cancel).await;
    session.release().await;

    if let Ok(entries) = &result {
        info!(total = entries.len(), "Directory search completed");
    }
    result
}

/// Issue page requests on a bound client until the server reports the last
/// page, the result cap is reached, or the search is cancelled.
pub async fn drain_pages<C: DirectoryClient>(
    client: &mut C,
    spec: &SearchRequestSpec,
    cancel: &CancellationToken,
) -> ConnectorResult<Vec<DirectoryEntry>> {
    let page_size = spec.effective_page_size();
    let limit = spec.result_limit();
    let mut cursor = PageCursor::start();
    let mut entries: Vec<DirectoryEntry> = Vec::new();
    let mut page_number: u32 = 0;

    loop {
        check_cancelled(cancel)?;
        page_number += 1;

        let request = PageRequest {
            spec,
            page_size,
            cursor: &cursor,
            page_number,
        };

        debug!(
            page = page_number,
            page_size,
            filter = %spec.effective_filter(),
            "Requesting page"
        );

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!(page = page_number, "Search cancelled while waiting for page");
                return Err(ConnectorError::Cancelled);
            }
            response = client.search_page(&request) => response?,
        };

        let returned = response.entries.len();
        let next = response.next_cursor().cloned();

        for raw in response.entries {
            entries.push(coerce_entry(raw, &spec.attributes)?);

            if limit.is_some_and(|max| entries.len() >= max) {
                debug!(
                    page = page_number,
                    max_results = spec.max_results,
                    "Result cap reached, not requesting further pages"
                );
                return Ok(entries);
            }
        }

        debug!(
            page = page_number,
            returned,
            accumulated = entries.len(),
            more = next.is_some(),
            "Page received"
        );

        match next {
            Some(next) => cursor = next,
            None => return Ok(entries),
        }
    }
}

fn check_cancelled(cancel: &CancellationToken) -> ConnectorResult<()> {
    if cancel.is_cancelled() {
        info!("Search cancelled before next request");
        return Err(ConnectorError::Cancelled);
    }
    Ok(())
}
