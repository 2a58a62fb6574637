pub mod dispatch;
pub mod fanout;
pub mod loader;
pub mod reservation;
pub mod runner;
pub mod summary;
pub mod window;

#[cfg(test)]
pub(crate) mod test_support;

pub use runner::ReminderEngine;
