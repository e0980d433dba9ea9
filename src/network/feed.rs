use tokio::sync::mpsc::Sender;
use tracing::debug;

use crate::consensus::message::{Message, Value};
use crate::consensus::peers::NodeId;
use crate::consensus::processor::RoundReport;
use crate::error::SimError;

/// One renderable step of a finished round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEvent {
    Delivered(Message),
    Decided { node: NodeId, value: Value },
}

/// Replays a finished round for the rendering side: every delivery in
/// round order, then every decision in roster order. A `Decided` event
/// never precedes a delivery, so the consumer sees the same barrier the
/// round itself enforced.
pub async fn replay(report: &RoundReport, tx: &Sender<RoundEvent>) -> Result<(), SimError> {
    for message in &report.log {
        tx.send(RoundEvent::Delivered(*message))
            .await
            .map_err(|_| SimError::FeedClosed)?;
    }

    for node in &report.members {
        // a decided report carries one decision per member
        let value = report.decisions[node];
        debug!(node = %node, value, "replayed decision");
        tx.send(RoundEvent::Decided { node: *node, value })
            .await
            .map_err(|_| SimError::FeedClosed)?;
    }

    Ok(())
}
