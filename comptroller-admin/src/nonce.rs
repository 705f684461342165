//! Nonce resolution and the per-run nonce ledger.
//!
//! The relay service's queue view is asynchronous and best-effort, so it is
//! consulted exactly once per run to seed the ledger; afterwards the ledger,
//! not the network, is the source of truth for every subsequent proposal.

use safe_client::queue::QueueEntry;
use tracing::info;

use crate::traits::SafeService;
use crate::AdminResult;

/// How the seed nonce for a run is chosen.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonceStrategy {
    /// Use this exact nonce, skipping all network calls. Highest priority.
    pub override_nonce: Option<u64>,
    /// Ignore the pending queue and restart from the Safe's last confirmed
    /// nonce. Useful for replacing a bad queue: the new proposals conflict
    /// with the queued ones and supersede them once executed.
    pub restart_from_confirmed: bool,
}

/// Computes the nonce for the first proposal of a run.
///
/// Order: explicit override, else the last confirmed nonce when restarting,
/// else one past the pending queue's transaction entries, else the last
/// confirmed nonce when the queue holds no genuine transactions.
pub async fn resolve<S: SafeService + ?Sized>(
    service: &S,
    strategy: NonceStrategy,
) -> AdminResult<u64> {
    if let Some(nonce) = strategy.override_nonce {
        return Ok(nonce);
    }

    let last_confirmed = service.last_confirmed_nonce().await?;
    if strategy.restart_from_confirmed {
        info!(nonce = last_confirmed, "starting from last confirmed nonce");
        return Ok(last_confirmed);
    }

    // The gateway lists entries newest first; walk it oldest first and take
    // the first genuine transaction, skipping labels and conflict headers.
    let queue = service.queued_transactions().await?;
    let queued_nonce = queue.iter().rev().find_map(|entry| match entry {
        QueueEntry::Transaction { transaction } => {
            transaction.execution_info.as_ref().map(|info| info.nonce)
        }
        QueueEntry::Other => None,
    });

    match queued_nonce {
        Some(nonce) => {
            info!(nonce = nonce + 1, "continuing from pending queue");
            Ok(nonce + 1)
        }
        None => {
            info!(
                nonce = last_confirmed,
                "no pending transactions, starting from last confirmed nonce"
            );
            Ok(last_confirmed)
        }
    }
}

/// Hands out strictly increasing nonces for the rest of the run.
///
/// Allocation is a synchronous read-then-increment with no await point, so
/// two proposals issued back-to-back can never observe the same value. A
/// nonce is consumed whether or not the submission it was allocated for
/// ultimately succeeds: a gap in the numbering is acceptable,
/// double-assignment is not.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct NonceLedger {
    next: u64,
}

impl NonceLedger {
    /// Start a ledger from a resolved seed nonce.
    pub fn new(seed: u64) -> Self {
        Self { next: seed }
    }

    /// Take the current nonce and advance by exactly one.
    pub fn allocate(&mut self) -> u64 {
        let nonce = self.next;
        self.next += 1;
        nonce
    }

    /// Nonce the next allocation will return.
    pub fn peek(&self) -> u64 {
        self.next
    }
}

/// Audit record of one allocated nonce. Appended, never mutated.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ProposalLogEntry {
    /// Nonce assigned to the proposal.
    pub nonce: u64,
    /// Human-readable description of what was proposed.
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_hands_out_consecutive_nonces() {
        let mut ledger = NonceLedger::new(7);
        assert_eq!(ledger.peek(), 7);
        assert_eq!(ledger.allocate(), 7);
        assert_eq!(ledger.allocate(), 8);
        assert_eq!(ledger.allocate(), 9);
        assert_eq!(ledger.peek(), 10);
    }
}
