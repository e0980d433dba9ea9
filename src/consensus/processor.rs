use std::collections::HashMap;

use tracing::debug;

use crate::error::SimError;

use super::config::RoundConfig;
use super::message::{Message, SendStrategy, Value};
use super::peers::NodeId;
use super::store::InboxStore;
use super::tally::Tally;

/// Round lifecycle. Strictly sequential; `Decided` is terminal and the
/// round's data is immutable once it is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Ready,
    Broadcasting,
    Delivered,
    Decided,
}

impl Stage {
    pub fn next(&self) -> Self {
        match self {
            Stage::Ready => Stage::Broadcasting,
            Stage::Broadcasting => Stage::Delivered,
            Stage::Delivered => Stage::Decided,
            Stage::Decided => Stage::Decided,
        }
    }
}

/// Drives one round: seed inboxes, deliver every send, then derive each
/// honest member's decision from its own inbox. A fresh processor is
/// required for every round; nothing carries over.
pub struct RoundProcessor {
    config: RoundConfig,
    stage: Stage,
    store: InboxStore,
    log: Vec<Message>,
    decisions: HashMap<NodeId, Value>,
}

/// Everything a finished round leaves behind, in the shape the rendering
/// side consumes. `members` lists the honest participants in roster
/// order; `inboxes` and `decisions` have one entry per member, and `log`
/// holds the round's deliveries in order.
#[derive(Debug, Clone)]
pub struct RoundReport {
    pub members: Vec<NodeId>,
    pub inboxes: HashMap<NodeId, Vec<Value>>,
    pub decisions: HashMap<NodeId, Value>,
    pub log: Vec<Message>,
}

impl RoundProcessor {
    /// Validates the configuration and seeds each honest member's inbox
    /// with exactly its own initial value. A traitor gets no inbox and
    /// never gets a decision.
    pub fn new(config: RoundConfig) -> Result<Self, SimError> {
        config.validate()?;

        let honest = config.honest_members();
        let mut store = InboxStore::new(&honest);
        for id in &honest {
            // initial_values covers the roster (checked in validate)
            store.push(*id, config.initial_values[id])?;
        }

        Ok(RoundProcessor {
            config,
            stage: Stage::Ready,
            store,
            log: Vec::new(),
            decisions: HashMap::new(),
        })
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn inbox(&self, id: &NodeId) -> Option<&[Value]> {
        self.store.inbox(id)
    }

    pub fn decision(&self, id: &NodeId) -> Option<Value> {
        self.decisions.get(id).copied()
    }

    pub fn message_log(&self) -> &[Message] {
        &self.log
    }

    /// Delivers every send for the round.
    ///
    /// Honest round: each roster member hands its own value to every
    /// other member, senders walked in roster order. Traitor round: the
    /// honest members exchange true values among themselves first, then
    /// the traitor's per-recipient picks land, so a recipient's inbox
    /// reads own value, honest senders in roster order, traitor last.
    pub fn broadcast(&mut self) -> Result<(), SimError> {
        self.require(Stage::Ready)?;
        self.stage = self.stage.next();

        match self.config.byzantine {
            None => {
                let members = self.config.peers.members.clone();
                for sender in &members {
                    let strategy = SendStrategy::Uniform(self.config.initial_values[sender]);
                    self.deliver_from(*sender, &strategy, &members)?;
                }
            }
            Some(traitor) => {
                let honest = self.config.honest_members();
                for sender in &honest {
                    let strategy = SendStrategy::Uniform(self.config.initial_values[sender]);
                    self.deliver_from(*sender, &strategy, &honest)?;
                }

                // Nothing forces the traitor's picks to agree with each
                // other or with its own initial value.
                let sends = self
                    .config
                    .byzantine_sends
                    .clone()
                    .ok_or(SimError::MissingTraitorSends)?;
                self.deliver_from(traitor, &SendStrategy::PerRecipient(sends), &honest)?;
            }
        }

        self.stage = self.stage.next();
        Ok(())
    }

    /// Derives each honest member's strict-majority decision from its
    /// completed inbox. Requires every send of the round to be in; an
    /// inbox without a strict majority is an error, never a guess.
    pub fn decide(&mut self) -> Result<(), SimError> {
        self.require(Stage::Delivered)?;

        let mut decisions = HashMap::new();
        for id in self.config.honest_members() {
            let inbox = self
                .store
                .inbox(&id)
                .ok_or(SimError::UnknownRecipient(id))?;
            let value = Tally::from_inbox(inbox)
                .strict_majority()
                .ok_or(SimError::NoMajority { node: id })?;
            debug!(node = %id, value, "decided");
            decisions.insert(id, value);
        }

        self.decisions = decisions;
        self.stage = self.stage.next();
        Ok(())
    }

    /// Broadcast, decide, and surrender the round's data.
    pub fn run(mut self) -> Result<RoundReport, SimError> {
        self.broadcast()?;
        self.decide()?;
        self.into_report()
    }

    /// Only a decided round has a report.
    pub fn into_report(self) -> Result<RoundReport, SimError> {
        if self.stage != Stage::Decided {
            return Err(SimError::WrongStage {
                expected: Stage::Decided,
                found: self.stage,
            });
        }

        Ok(RoundReport {
            members: self.config.honest_members(),
            inboxes: self.store.into_inner(),
            decisions: self.decisions,
            log: self.log,
        })
    }

    fn require(&self, expected: Stage) -> Result<(), SimError> {
        if self.stage != expected {
            return Err(SimError::WrongStage {
                expected,
                found: self.stage,
            });
        }
        Ok(())
    }

    fn deliver_from(
        &mut self,
        sender: NodeId,
        strategy: &SendStrategy,
        recipients: &[NodeId],
    ) -> Result<(), SimError> {
        for recipient in recipients {
            if *recipient == sender {
                continue;
            }
            let value = strategy
                .value_for(recipient)
                .ok_or(SimError::UnknownRecipient(*recipient))?;
            debug!(sender = %sender, recipient = %recipient, value, "delivered");
            self.store.push(*recipient, value)?;
            self.log.push(Message {
                sender,
                recipient: *recipient,
                value,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::peers::Peers;
    use super::*;

    const A: NodeId = NodeId('A');
    const B: NodeId = NodeId('B');
    const C: NodeId = NodeId('C');

    fn honest_config() -> RoundConfig {
        RoundConfig::honest(
            Peers::new(vec![A, B, C]),
            HashMap::from([(A, 1), (B, 1), (C, 0)]),
        )
    }

    fn sorted(values: &[Value]) -> Vec<Value> {
        let mut values = values.to_vec();
        values.sort_unstable();
        values
    }

    #[test]
    fn test_setup_seeds_own_value() {
        let processor = RoundProcessor::new(honest_config()).unwrap();
        assert_eq!(processor.stage(), Stage::Ready);
        assert_eq!(processor.inbox(&A), Some(&[1][..]));
        assert_eq!(processor.inbox(&B), Some(&[1][..]));
        assert_eq!(processor.inbox(&C), Some(&[0][..]));
    }

    #[test]
    fn test_honest_round() {
        let report = RoundProcessor::new(honest_config()).unwrap().run().unwrap();

        // Own value first, then the other senders in roster order.
        assert_eq!(report.inboxes[&A], vec![1, 1, 0]);
        assert_eq!(report.inboxes[&B], vec![1, 1, 0]);
        assert_eq!(report.inboxes[&C], vec![0, 1, 1]);

        // One entry per participant, nobody's own value changed.
        for id in [A, B, C] {
            assert_eq!(report.inboxes[&id].len(), 3);
        }
        assert_eq!(report.log.len(), 6);

        assert_eq!(report.decisions[&A], 1);
        assert_eq!(report.decisions[&B], 1);
        assert_eq!(report.decisions[&C], 1);
    }

    #[test]
    fn test_broadcast_is_permutation_invariant() {
        let forward = RoundProcessor::new(honest_config()).unwrap().run().unwrap();
        let reversed = RoundProcessor::new(RoundConfig::honest(
            Peers::new(vec![C, B, A]),
            HashMap::from([(A, 1), (B, 1), (C, 0)]),
        ))
        .unwrap()
        .run()
        .unwrap();

        for id in [A, B, C] {
            assert_eq!(
                sorted(&forward.inboxes[&id]),
                sorted(&reversed.inboxes[&id]),
            );
            assert_eq!(forward.decisions[&id], reversed.decisions[&id]);
        }
    }

    #[test]
    fn test_traitor_round_breaks_agreement() {
        let config = RoundConfig::with_traitor(
            Peers::new(vec![A, B, C]),
            HashMap::from([(A, 1), (B, 0), (C, 1)]),
            C,
            HashMap::from([(A, 1), (B, 0)]),
        );
        let report = RoundProcessor::new(config).unwrap().run().unwrap();

        assert_eq!(report.members, vec![A, B]);
        assert_eq!(report.inboxes[&A], vec![1, 0, 1]);
        assert_eq!(report.inboxes[&B], vec![0, 1, 0]);

        // Divergent decisions caused by equivocation alone.
        assert_eq!(report.decisions[&A], 1);
        assert_eq!(report.decisions[&B], 0);

        // The traitor has no inbox and no decision.
        assert!(!report.inboxes.contains_key(&C));
        assert!(!report.decisions.contains_key(&C));
    }

    #[test]
    fn test_decide_before_broadcast() {
        let mut processor = RoundProcessor::new(honest_config()).unwrap();
        assert_eq!(
            processor.decide(),
            Err(SimError::WrongStage {
                expected: Stage::Delivered,
                found: Stage::Ready,
            })
        );
    }

    #[test]
    fn test_broadcast_twice() {
        let mut processor = RoundProcessor::new(honest_config()).unwrap();
        processor.broadcast().unwrap();
        assert_eq!(
            processor.broadcast(),
            Err(SimError::WrongStage {
                expected: Stage::Ready,
                found: Stage::Delivered,
            })
        );
    }

    #[test]
    fn test_decided_round_is_final() {
        let mut processor = RoundProcessor::new(honest_config()).unwrap();
        processor.broadcast().unwrap();
        processor.decide().unwrap();
        assert_eq!(processor.stage(), Stage::Decided);
        assert_eq!(
            processor.decide(),
            Err(SimError::WrongStage {
                expected: Stage::Delivered,
                found: Stage::Decided,
            })
        );
    }

    #[test]
    fn test_report_requires_decided_round() {
        let processor = RoundProcessor::new(honest_config()).unwrap();
        assert!(matches!(
            processor.into_report(),
            Err(SimError::WrongStage { .. })
        ));
    }

    #[test]
    fn test_no_majority_is_an_error() {
        // Two members with split values leave both inboxes tied.
        let config = RoundConfig::honest(
            Peers::new(vec![A, B]),
            HashMap::from([(A, 1), (B, 0)]),
        );
        let mut processor = RoundProcessor::new(config).unwrap();
        processor.broadcast().unwrap();
        assert_eq!(
            processor.decide(),
            Err(SimError::NoMajority { node: A })
        );
    }
}
