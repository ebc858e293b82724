//! Workflow transition walks keyed by the issue's current status.

use std::collections::BTreeMap;

use anyhow::{anyhow, Context, Result};
use jira::JiraClient;
use tracing::{debug, instrument};

/// Transition IDs to invoke for an issue currently in `current_state`.
///
/// `transitions` maps a status ID to a JSON array of transition IDs, as
/// configured under `attribute`.
pub fn sequence_for(
    attribute: &str,
    transitions: &BTreeMap<String, String>,
    current_state: &str,
) -> Result<Vec<String>> {
    let raw = transitions.get(current_state).ok_or_else(|| {
        anyhow!("{attribute}: cannot find transition sequence for state: {current_state}")
    })?;

    serde_json::from_str(raw)
        .with_context(|| format!("{attribute}: cannot unmarshal provided string: {raw}"))
}

/// Invoke each transition in order, stopping at the first failure.
#[instrument(skip(client, sequence), fields(steps = sequence.len()))]
pub async fn walk(client: &JiraClient, issue_id: &str, sequence: &[String]) -> Result<()> {
    for transition in sequence {
        client
            .transition_issue(issue_id, transition)
            .await
            .with_context(|| format!("transitioning jira issue {issue_id} via {transition} failed"))?;
        debug!(issue_id, transition = %transition, "Applied transition");
    }
    Ok(())
}
