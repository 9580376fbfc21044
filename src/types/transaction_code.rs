//! Transaction code classification
//!
//! The second digit of a domestic transaction code tells the direction:
//! 1-4 are credits, 5-9 are debits. A second digit of 3 or 8 marks a
//! prenotification, which must carry a zero amount.
//!
//! ADV entries use their own 81-88 range where odd codes are credits and
//! even codes are debits.

/// Whether `code` is a valid domestic (non-ADV) transaction code
pub fn is_valid(code: u16) -> bool {
    matches!(code, 21..=24 | 26..=29 | 31..=34 | 36..=39 | 41..=44 | 46..=49 | 51..=56)
}

/// Credit to the receiver's account
pub fn is_credit(code: u16) -> bool {
    is_valid(code) && matches!(code % 10, 1..=4)
}

/// Debit to the receiver's account
pub fn is_debit(code: u16) -> bool {
    is_valid(code) && matches!(code % 10, 5..=9)
}

/// Zero-dollar prenotification
pub fn is_prenote(code: u16) -> bool {
    is_valid(code) && matches!(code % 10, 3 | 8)
}

/// Whether `code` is a valid ADV entry transaction code
pub fn is_valid_adv(code: u16) -> bool {
    (81..=88).contains(&code)
}

pub fn is_adv_credit(code: u16) -> bool {
    is_valid_adv(code) && code % 2 == 1
}

pub fn is_adv_debit(code: u16) -> bool {
    is_valid_adv(code) && code % 2 == 0
}
