use std::fmt;

use rand::Rng;

/// What a customer came to do.
///
/// Only the routing matters: a withdrawal needs the manager before the safe,
/// a deposit goes straight to the safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transaction {
    /// Safe only.
    Deposit,
    /// Manager, then safe.
    Withdraw,
}

impl Transaction {
    /// Picks deposit or withdraw with equal probability.
    pub fn random() -> Self {
        if rand::rng().random_bool(0.5) {
            Transaction::Deposit
        } else {
            Transaction::Withdraw
        }
    }

    /// True if the teller must get the manager's permission first.
    #[inline]
    pub fn needs_manager(self) -> bool {
        matches!(self, Transaction::Withdraw)
    }

    /// Noun used in the event log ("a deposit", "a withdrawal").
    pub fn as_noun(self) -> &'static str {
        match self {
            Transaction::Deposit => "deposit",
            Transaction::Withdraw => "withdrawal",
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transaction::Deposit => f.write_str("deposit"),
            Transaction::Withdraw => f.write_str("withdraw"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_withdraw_needs_manager() {
        assert!(Transaction::Withdraw.needs_manager());
        assert!(!Transaction::Deposit.needs_manager());
    }

    #[test]
    fn test_random_produces_both_kinds() {
        let draws: Vec<_> = (0..200).map(|_| Transaction::random()).collect();
        assert!(draws.contains(&Transaction::Deposit));
        assert!(draws.contains(&Transaction::Withdraw));
    }
}
