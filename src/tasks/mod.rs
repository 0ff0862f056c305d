//! Background Tasks Module
//!
//! Detached work started by the caches.
//!
//! # Tasks
//! - Expiry watcher: sleeps for one TTL, then runs its expiry callback, hosted
//!   by a shared expiry runtime

mod expiry;

pub use expiry::{expiry_runtime, spawn_expiry_watcher};
