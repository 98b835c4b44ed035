//! Domain records produced by chain sources

pub mod balance;
pub mod entity;
pub mod event;
pub mod verification;

pub use balance::*;
pub use entity::*;
pub use event::*;
pub use verification::*;
