/*
    A consensus protocol lets a set of processes that each start with an input value agree on a common output. Three properties make an execution count as agreement: Termination (every correct process eventually decides), Agreement (no two correct processes decide differently), and Validity (if every correct process proposes the same value, that value is the one decided).

    The classic way these properties break is a Byzantine participant. In Lamport's telling, a traitorous general does not merely stay silent: he tells each loyal general a different story. With three participants and one traitor, the two loyal ones collect inboxes that disagree with each other, both take an honest majority vote, and they still decide different values. Nothing in either loyal process misbehaved; equivocation alone is enough.

    This binary plays the staged rounds behind that illustration: the agreement walkthrough (a disagreement round followed by an explicit corrected round), the validity walkthrough, and the traitor round. Each round is computed first, then replayed as an ordered event feed the way a rendering collaborator would consume it.
*/

use consensus_sim::consensus::{scenarios, RoundConfig, RoundProcessor, RoundReport};
use consensus_sim::error::SimError;
use consensus_sim::network::feed::{replay, RoundEvent};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), SimError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("agreement walkthrough: initial disagreement");
    let first = run_round(scenarios::disagreement_round()).await?;

    info!("agreement walkthrough: corrected follow-up round");
    run_round(scenarios::corrected_round(&first)?).await?;

    info!("validity walkthrough: unanimous proposals");
    run_round(scenarios::unanimous_round()).await?;

    info!("traitor walkthrough: C equivocates");
    run_round(scenarios::traitor_round()).await?;

    Ok(())
}

async fn run_round(config: RoundConfig) -> Result<RoundReport, SimError> {
    let report = RoundProcessor::new(config)?.run()?;

    let (tx, mut rx) = mpsc::channel(100);
    replay(&report, &tx).await?;
    drop(tx);

    while let Some(event) = rx.recv().await {
        match event {
            RoundEvent::Delivered(message) => info!(
                sender = %message.sender,
                recipient = %message.recipient,
                value = message.value,
                "delivered"
            ),
            RoundEvent::Decided { node, value } => info!(node = %node, value, "decided"),
        }
    }

    for node in &report.members {
        info!(node = %node, inbox = ?report.inboxes[node], "final inbox");
    }

    Ok(report)
}
