use crate::quotes::QuoteStatus;

/// Service for managing quote status transitions
pub struct StatusMachine;

impl StatusMachine {
    /// Check if a status transition is valid
    ///
    /// # Valid Transitions
    /// - Draft → Sent
    /// - Sent → Accepted, Rejected, Expired
    /// - Accepted/Rejected/Expired are terminal
    /// - Any status → Same status (idempotent)
    pub fn is_valid_transition(from: QuoteStatus, to: QuoteStatus) -> bool {
        // Same status is always valid (idempotent)
        if from == to {
            return true;
        }

        match (from, to) {
            (QuoteStatus::Draft, QuoteStatus::Sent) => true,

            (QuoteStatus::Sent, QuoteStatus::Accepted) => true,
            (QuoteStatus::Sent, QuoteStatus::Rejected) => true,
            (QuoteStatus::Sent, QuoteStatus::Expired) => true,

            // Terminal states and everything else
            _ => false,
        }
    }

    /// Attempt to transition from one status to another
    ///
    /// # Returns
    /// `Ok(to)` if the transition is valid, `Err(message)` otherwise
    pub fn transition(from: QuoteStatus, to: QuoteStatus) -> Result<QuoteStatus, String> {
        if Self::is_valid_transition(from, to) {
            Ok(to)
        } else {
            Err(format!("Invalid status transition from {} to {}", from, to))
        }
    }
}
