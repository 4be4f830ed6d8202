use std::{fmt::Display, ops::Deref};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Percentage(f64);

impl Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}%", self.0)
    }
}

impl Percentage {
    /// Offset of `index`-th slot when space is split into `count` equal slots.
    pub fn slot_offset(index: usize, count: usize) -> Percentage {
        Percentage(index as f64 / count.max(1) as f64 * 100.)
    }

    /// Size of one slot when space is split into `count` equal slots.
    pub fn slot_width(count: usize) -> Percentage {
        Percentage(100. / count.max(1) as f64)
    }
}

impl Deref for Percentage {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
