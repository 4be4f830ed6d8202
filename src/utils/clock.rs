use chrono::{DateTime, Local};

/// Represents an entity responsible for providing the current time. Layout never asks for the time
/// on its own, so everything that needs "now" goes through this trait, which keeps it replaceable
/// in tests.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Sync + Send + 'static {
    fn time(&self) -> DateTime<Local>;
}

pub struct DefaultClock;

impl Clock for DefaultClock {
    fn time(&self) -> DateTime<Local> {
        Local::now()
    }
}
