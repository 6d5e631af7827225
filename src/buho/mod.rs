//! Buho Suite Vectors node.
//!
//! Runs a similarity search against a Buho Suite knowledge base for every
//! input item and returns the remote response unchanged.
//!
//! ```text
//!  items --> SearchParameters::read --> POST ep_search_similar_chunks_contents_by_text
//!                                              |
//!                      +-----------------------+---------------+
//!                      v                                       v
//!              { json: <response> }            { json: { error } }  or  abort
//! ```

mod dispatcher;
mod parameters;

#[cfg(test)]
pub(crate) mod testing;

pub use dispatcher::{FailurePolicy, ItemFailure, ItemOutcome, SearchDispatcher};
pub use parameters::{SearchParameters, DEFAULT_TOP_K};

use async_trait::async_trait;
use std::sync::Arc;

use crate::http::HttpClient;
use crate::node::{
    ExecutionContext, Node, NodeDescription, NodeDescriptionBuilder, NodeExecutionData, NodeResult,
};

/// Similarity search endpoint
pub const SEARCH_URL: &str =
    "https://api.buhosuite.com/api/v2/kbvectors/ep_search_similar_chunks_contents_by_text/";

/// Node type name, also used as display name and default instance name
pub const NODE_DISPLAY_NAME: &str = "Buho Suite Vectors";

const NODE_ICON_LIGHT: &str = "file:../../icons/logobuhov3.svg";
const NODE_ICON_DARK: &str = "file:../../icons/logobuhov3.svg";

/// Description of the Buho Suite Vectors node
pub fn description() -> NodeDescription {
    NodeDescriptionBuilder::new(NODE_DISPLAY_NAME)
        .icon(NODE_ICON_LIGHT, NODE_ICON_DARK)
        .group("transform")
        .version(1)
        .usable_as_tool(true)
        .properties(SearchParameters::properties())
        .build()
}

/// The Buho Suite Vectors node
pub struct BuhoVectors {
    description: NodeDescription,
    dispatcher: SearchDispatcher,
}

impl BuhoVectors {
    /// Create the node on top of an HTTP executor
    pub fn new(client: Arc<dyn HttpClient>) -> Self {
        Self {
            description: description(),
            dispatcher: SearchDispatcher::new(client),
        }
    }
}

#[async_trait]
impl Node for BuhoVectors {
    fn description(&self) -> &NodeDescription {
        &self.description
    }

    async fn execute(&self, ctx: &ExecutionContext) -> NodeResult<Vec<NodeExecutionData>> {
        let policy = FailurePolicy::from_continue_on_fail(ctx.continue_on_fail());
        let item_count = ctx.input_data().len();

        tracing::debug!(
            "Executing '{}' ({}) over {} items, policy {:?}",
            ctx.node.name,
            ctx.execution_id,
            item_count,
            policy
        );

        self.dispatcher
            .dispatch(&ctx.node, ctx, item_count, policy)
            .await
    }
}
