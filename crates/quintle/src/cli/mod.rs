mod commands;
pub mod balances;
pub mod context;
pub mod entities;
pub mod network;
pub mod social;
pub mod upload;

// Re-export all items from commands module
pub use commands::*;
