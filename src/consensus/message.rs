use std::collections::HashMap;

use super::peers::NodeId;

/// Proposed and decided values. The walkthroughs only ever use 0 and 1,
/// but nothing below assumes the domain is binary.
pub type Value = u8;

/// One delivered (sender, recipient, value) triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message {
    pub sender: NodeId,
    pub recipient: NodeId,
    pub value: Value,
}

/// How a sender picks the value carried to each recipient.
///
/// An honest node is `Uniform`: the same value goes to everyone. A
/// traitor is `PerRecipient` and may equivocate, handing different
/// recipients different values within the same round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendStrategy {
    Uniform(Value),
    PerRecipient(HashMap<NodeId, Value>),
}

impl SendStrategy {
    pub fn value_for(&self, recipient: &NodeId) -> Option<Value> {
        match self {
            SendStrategy::Uniform(value) => Some(*value),
            SendStrategy::PerRecipient(values) => values.get(recipient).copied(),
        }
    }
}
