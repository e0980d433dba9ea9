use std::collections::HashMap;

use crate::error::SimError;

use super::message::Value;
use super::peers::{NodeId, Peers};

/// Immutable inputs for one round: the roster, each member's initial
/// value, and optionally one designated traitor together with the value
/// it hands each honest recipient.
///
/// A traitor without per-recipient sends is rejected rather than
/// defaulted to its own value: equivocation is an explicit input.
#[derive(Debug, Clone)]
pub struct RoundConfig {
    pub peers: Peers,
    pub initial_values: HashMap<NodeId, Value>,
    pub byzantine: Option<NodeId>,
    pub byzantine_sends: Option<HashMap<NodeId, Value>>,
}

impl RoundConfig {
    pub fn honest(peers: Peers, initial_values: HashMap<NodeId, Value>) -> Self {
        RoundConfig {
            peers,
            initial_values,
            byzantine: None,
            byzantine_sends: None,
        }
    }

    pub fn with_traitor(
        peers: Peers,
        initial_values: HashMap<NodeId, Value>,
        traitor: NodeId,
        sends: HashMap<NodeId, Value>,
    ) -> Self {
        RoundConfig {
            peers,
            initial_values,
            byzantine: Some(traitor),
            byzantine_sends: Some(sends),
        }
    }

    /// Roster members that follow the broadcast rule this round.
    pub fn honest_members(&self) -> Vec<NodeId> {
        self.peers.honest(self.byzantine)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.peers.is_empty() {
            return Err(SimError::EmptyRoster);
        }

        for (i, id) in self.peers.members.iter().enumerate() {
            if self.peers.members[..i].contains(id) {
                return Err(SimError::DuplicateParticipant(*id));
            }
        }

        for id in &self.peers.members {
            if !self.initial_values.contains_key(id) {
                return Err(SimError::InitialValueMismatch(*id));
            }
        }
        for id in self.initial_values.keys() {
            if !self.peers.is_member(id) {
                return Err(SimError::InitialValueMismatch(*id));
            }
        }

        match self.byzantine {
            None => {
                if self.byzantine_sends.is_some() {
                    return Err(SimError::StraySends);
                }
            }
            Some(traitor) => {
                if !self.peers.is_member(&traitor) {
                    return Err(SimError::UnknownTraitor(traitor));
                }

                let sends = self
                    .byzantine_sends
                    .as_ref()
                    .ok_or(SimError::MissingTraitorSends)?;
                let honest = self.peers.honest(Some(traitor));
                for id in &honest {
                    if !sends.contains_key(id) {
                        return Err(SimError::TraitorSendMismatch(*id));
                    }
                }
                for id in sends.keys() {
                    if !honest.contains(id) {
                        return Err(SimError::TraitorSendMismatch(*id));
                    }
                }
            }
        }

        Ok(())
    }
}
