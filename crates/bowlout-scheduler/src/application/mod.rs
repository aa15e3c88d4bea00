//! Application layer for the scheduler context.

pub mod command_handlers;
pub mod query_handlers;
pub mod services;
