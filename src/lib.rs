//! Toban Bot — weekly duty roster reminder for a LINE group.

pub mod channels;
pub mod config;
pub mod controller;
pub mod error;
pub mod roster;
pub mod scheduler;
pub mod store;
pub mod webhook;
