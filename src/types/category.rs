//! Entry category
//!
//! The category of an entry is decided by the addenda attached to it: a
//! forward entry carries none (or only payment-related addenda), a return
//! carries an Addenda99, a notification of change an Addenda98, and the two
//! dishonored-return flavours their own Addenda99 variants.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of instruction an entry represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    /// An original credit or debit instruction
    #[default]
    Forward,
    /// A returned entry (Addenda99)
    Return,
    /// A notification of change (Addenda98)
    Noc,
    /// A return dishonored by the ODFI
    DishonoredReturn,
    /// A dishonored return contested by the RDFI
    DishonoredReturnContested,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Forward => "Forward",
            Category::Return => "Return",
            Category::Noc => "NOC",
            Category::DishonoredReturn => "DishonoredReturn",
            Category::DishonoredReturnContested => "DishonoredReturnContested",
        };
        f.write_str(name)
    }
}
