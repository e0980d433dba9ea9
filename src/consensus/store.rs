use std::collections::HashMap;

use crate::error::SimError;

use super::message::Value;
use super::peers::NodeId;

/// Per-node inboxes for one round. Inboxes start empty, grow append-only
/// while the round is live, and are only read once delivery is over.
#[derive(Debug, Clone, Default)]
pub struct InboxStore {
    inboxes: HashMap<NodeId, Vec<Value>>,
}

impl InboxStore {
    pub fn new(members: &[NodeId]) -> Self {
        InboxStore {
            inboxes: members.iter().map(|id| (*id, Vec::new())).collect(),
        }
    }

    pub fn push(&mut self, recipient: NodeId, value: Value) -> Result<(), SimError> {
        self.inboxes
            .get_mut(&recipient)
            .ok_or(SimError::UnknownRecipient(recipient))?
            .push(value);
        Ok(())
    }

    pub fn inbox(&self, id: &NodeId) -> Option<&[Value]> {
        self.inboxes.get(id).map(Vec::as_slice)
    }

    pub fn into_inner(self) -> HashMap<NodeId, Vec<Value>> {
        self.inboxes
    }
}
