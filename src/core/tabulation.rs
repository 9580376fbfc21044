//! Control totals shared by batches and files
//!
//! A [`Totals`] value is what a control record *should* say. Batches build
//! one from their entries, files build one from their batches, and both
//! compare it against the control record they carry.

use crate::io::fields::least_significant_digits;

/// Digits kept by the entry hash
pub const ENTRY_HASH_DIGITS: u32 = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub entry_addenda_count: u32,
    pub entry_hash: u64,
    pub total_debit: u64,
    pub total_credit: u64,
}

impl Totals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one entry and the addenda attached to it.
    ///
    /// The RDFI prefix is added to the hash and the hash is truncated to its
    /// ten least-significant digits straight away, so it never overflows.
    pub fn add_entry(&mut self, rdfi_identification: &str, addenda: usize, amount: u64, direction: Direction) {
        let count = u32::try_from(addenda).unwrap_or(u32::MAX).saturating_add(1);
        self.entry_addenda_count = self.entry_addenda_count.saturating_add(count);
        let prefix = least_significant_digits(
            rdfi_identification.trim().parse().unwrap_or(0),
            ENTRY_HASH_DIGITS,
        );
        self.entry_hash = least_significant_digits(self.entry_hash + prefix, ENTRY_HASH_DIGITS);
        match direction {
            Direction::Debit => self.total_debit = self.total_debit.saturating_add(amount),
            Direction::Credit => self.total_credit = self.total_credit.saturating_add(amount),
            Direction::None => {}
        }
    }

    /// Fold another set of totals (a batch's) into this one (a file's)
    pub fn absorb(&mut self, other: &Totals) {
        self.entry_addenda_count = self
            .entry_addenda_count
            .saturating_add(other.entry_addenda_count);
        self.entry_hash =
            least_significant_digits(self.entry_hash + other.entry_hash, ENTRY_HASH_DIGITS);
        self.total_debit = self.total_debit.saturating_add(other.total_debit);
        self.total_credit = self.total_credit.saturating_add(other.total_credit);
    }

    /// Debit plus credit, the dollar figure merge ceilings apply to
    pub fn dollar_amount(&self) -> u64 {
        self.total_debit.saturating_add(self.total_credit)
    }
}

/// Which control total an entry's amount is summed into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Debit,
    Credit,
    /// Invalid transaction code; counted and hashed but not summed
    None,
}

impl Direction {
    pub fn of(is_credit: bool, is_debit: bool) -> Self {
        if is_debit {
            Direction::Debit
        } else if is_credit {
            Direction::Credit
        } else {
            Direction::None
        }
    }
}

/// Physical blocks needed for `lines` logical records
pub fn block_count(lines: usize) -> usize {
    lines.div_ceil(crate::io::fields::BLOCKING_FACTOR)
}
