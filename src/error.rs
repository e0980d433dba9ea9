use thiserror::Error;

use crate::consensus::peers::NodeId;
use crate::consensus::processor::Stage;

/// Everything that can go wrong in a round. All of these are fatal to
/// the round in progress; the caller gets no partial results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("round roster is empty")]
    EmptyRoster,

    #[error("participant {0} appears in the roster more than once")]
    DuplicateParticipant(NodeId),

    #[error("initial values must cover each participant exactly once (offending participant {0})")]
    InitialValueMismatch(NodeId),

    #[error("designated traitor {0} is not in the roster")]
    UnknownTraitor(NodeId),

    #[error("a traitor was designated but no per-recipient sends were supplied")]
    MissingTraitorSends,

    #[error("traitor sends must cover each honest participant exactly once (offending participant {0})")]
    TraitorSendMismatch(NodeId),

    #[error("per-recipient sends were supplied without designating a traitor")]
    StraySends,

    #[error("operation requires stage {expected:?} but the round is at {found:?}")]
    WrongStage { expected: Stage, found: Stage },

    #[error("inbox of {node} has no strict majority")]
    NoMajority { node: NodeId },

    #[error("delivery addressed to unknown recipient {0}")]
    UnknownRecipient(NodeId),

    #[error("event feed consumer hung up")]
    FeedClosed,
}
