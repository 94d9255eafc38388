//! Shared utilities.

pub mod html;
mod plural;

#[cfg(test)]
pub mod test_server;

pub use plural::plural_count;
