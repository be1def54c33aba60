//! Explicit gas metering threaded through every verification path.

use thiserror::Error;

/// Returned when a consumption would exceed the meter's limit.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("out of gas in location: {descriptor}; gas limit: {limit}, gas used: {consumed}")]
pub struct OutOfGas {
    /// What was being charged for
    pub descriptor: String,
    /// The meter limit
    pub limit: u64,
    /// Consumption including the failed charge
    pub consumed: u64,
}

/// A gas budget and the amount consumed against it.
///
/// Consumption that overflows the limit is still recorded, so a caller
/// always sees the full cost of a failed call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GasMeter {
    limit: u64,
    consumed: u64,
}

impl GasMeter {
    /// A meter with the given limit.
    #[must_use]
    pub const fn new(limit: u64) -> Self {
        Self { limit, consumed: 0 }
    }

    /// A meter that never runs out.
    #[must_use]
    pub const fn infinite() -> Self {
        Self::new(u64::MAX)
    }

    /// Charges `amount` gas.
    ///
    /// # Errors
    /// Returns [`OutOfGas`] if the total consumption exceeds the limit.
    pub fn consume(&mut self, amount: u64, descriptor: &str) -> Result<(), OutOfGas> {
        self.consumed = self.consumed.saturating_add(amount);
        if self.consumed > self.limit {
            return Err(OutOfGas {
                descriptor: descriptor.to_string(),
                limit: self.limit,
                consumed: self.consumed,
            });
        }
        Ok(())
    }

    /// Gas consumed so far.
    #[must_use]
    pub const fn consumed(&self) -> u64 {
        self.consumed
    }

    /// The meter limit.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// Gas left before the limit is hit.
    #[must_use]
    pub const fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.consumed)
    }
}
