//! Simple to use cli for looking at your tracked sessions of a day the way a calendar day view
//! shows them. Overlapping sessions are placed side by side, see [layout] for how it's done.
//!

pub mod cli;
pub mod layout;
pub mod storage;
pub mod utils;
