//! Per-item search request dispatch.
//!
//! Items are processed strictly in order with at most one request in
//! flight. Each item yields an [`ItemOutcome`]; a [`FailurePolicy`] chosen
//! before the loop decides whether a failure becomes an output record or
//! ends the batch.

use serde_json::Value as JsonValue;
use std::ops::ControlFlow;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::parameters::SearchParameters;
use crate::http::HttpClient;
use crate::node::{NodeError, NodeExecutionData, NodeHandle, NodeResult, ParameterSource};

/// What happens to the batch when an item fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// First failure aborts the whole batch
    #[default]
    Abort,
    /// Failures become `{ "error": message }` records
    ContinueOnFail,
}

impl FailurePolicy {
    pub fn from_continue_on_fail(continue_on_fail: bool) -> Self {
        if continue_on_fail {
            FailurePolicy::ContinueOnFail
        } else {
            FailurePolicy::Abort
        }
    }

    /// Turn an item outcome into an output record, or break with the failure
    pub fn resolve(&self, outcome: ItemOutcome) -> ControlFlow<ItemFailure, NodeExecutionData> {
        match (outcome, self) {
            (Ok(body), _) => ControlFlow::Continue(NodeExecutionData::new(body)),
            (Err(failure), FailurePolicy::ContinueOnFail) => {
                ControlFlow::Continue(NodeExecutionData::error(failure.message))
            }
            (Err(failure), FailurePolicy::Abort) => ControlFlow::Break(failure),
        }
    }
}

/// A failed item, normalized to its message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub item_index: usize,
    pub message: String,
}

impl ItemFailure {
    fn new(item_index: usize, err: impl std::fmt::Display) -> Self {
        Self {
            item_index,
            message: err.to_string(),
        }
    }
}

/// Result of dispatching one item: the response body verbatim, or a failure
pub type ItemOutcome = Result<JsonValue, ItemFailure>;

/// Sends one similarity search request per input item
#[derive(Clone)]
pub struct SearchDispatcher {
    client: Arc<dyn HttpClient>,
}

impl SearchDispatcher {
    pub fn new(client: Arc<dyn HttpClient>) -> Self {
        Self { client }
    }

    /// Read the parameters of one item and perform its request.
    ///
    /// Parameter and HTTP failures are reported the same way.
    pub async fn dispatch_item(
        &self,
        source: &dyn ParameterSource,
        item_index: usize,
    ) -> ItemOutcome {
        let params = SearchParameters::read(source, item_index)
            .map_err(|e| ItemFailure::new(item_index, e))?;

        debug!(
            "Dispatching search for item {} (kb_id={}, top_k={})",
            item_index, params.kb_id, params.top_k
        );

        self.client
            .request(params.to_request())
            .await
            .map_err(|e| ItemFailure::new(item_index, e))
    }

    /// Dispatch `item_count` items in order.
    ///
    /// Returns one record per item, or the first failure wrapped as
    /// [`NodeError::Operation`] when the policy is [`FailurePolicy::Abort`].
    pub async fn dispatch(
        &self,
        node: &NodeHandle,
        source: &dyn ParameterSource,
        item_count: usize,
        policy: FailurePolicy,
    ) -> NodeResult<Vec<NodeExecutionData>> {
        let mut output = Vec::with_capacity(item_count);
        let mut failed = 0usize;

        for item_index in 0..item_count {
            let outcome = self.dispatch_item(source, item_index).await;

            if let Err(failure) = &outcome {
                failed += 1;
                if policy == FailurePolicy::ContinueOnFail {
                    warn!("Item {} failed, continuing: {}", item_index, failure.message);
                }
            }

            match policy.resolve(outcome) {
                ControlFlow::Continue(record) => output.push(record),
                ControlFlow::Break(failure) => {
                    error!(
                        "Node '{}' aborted on item {}: {}",
                        node.name, failure.item_index, failure.message
                    );
                    return Err(NodeError::operation(
                        node.name.clone(),
                        failure.item_index,
                        failure.message,
                    ));
                }
            }
        }

        info!(
            "Node '{}' processed {} items ({} failed)",
            node.name, item_count, failed
        );

        Ok(output)
    }
}
