//! The staged rounds the illustration walks through: the agreement
//! walkthrough (initial disagreement, then the corrected follow-up), the
//! validity walkthrough, and the traitor walkthrough.

use std::collections::HashMap;

use crate::error::SimError;

use super::config::RoundConfig;
use super::peers::{NodeId, Peers};
use super::processor::RoundReport;

pub const A: NodeId = NodeId('A');
pub const B: NodeId = NodeId('B');
pub const C: NodeId = NodeId('C');

/// The three-node roster the illustration draws as a triangle.
pub fn roster() -> Peers {
    Peers::new(vec![A, B, C])
}

/// Termination/Agreement walkthrough: A and B propose 1, C proposes 0.
/// Every inbox ends up holding the multiset {1, 1, 0}.
pub fn disagreement_round() -> RoundConfig {
    RoundConfig::honest(roster(), HashMap::from([(A, 1), (B, 1), (C, 0)]))
}

/// The follow-up round in which every member's input is its previous
/// decision. The illustration's "C adopts 1" moment is this round with
/// fresh state, not an edit of the previous round's history.
pub fn corrected_round(report: &RoundReport) -> Result<RoundConfig, SimError> {
    let peers = roster();
    let mut initial_values = HashMap::new();
    for id in &peers.members {
        let value = report
            .decisions
            .get(id)
            .copied()
            .ok_or(SimError::InitialValueMismatch(*id))?;
        initial_values.insert(*id, value);
    }
    Ok(RoundConfig::honest(peers, initial_values))
}

/// Validity walkthrough: everyone proposes 1, so everyone must decide 1.
pub fn unanimous_round() -> RoundConfig {
    RoundConfig::honest(roster(), HashMap::from([(A, 1), (B, 1), (C, 1)]))
}

/// Traitor walkthrough: C equivocates, telling A "1" and B "0".
pub fn traitor_round() -> RoundConfig {
    RoundConfig::with_traitor(
        roster(),
        HashMap::from([(A, 1), (B, 0), (C, 1)]),
        C,
        HashMap::from([(A, 1), (B, 0)]),
    )
}
