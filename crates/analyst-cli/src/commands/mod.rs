//! Command implementations.

pub mod ask;
pub mod profile;

pub use self::ask::{execute_ask, submit_with_progress};
pub use self::profile::execute_profile;
