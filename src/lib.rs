//! TrainFriends Core Library
//!
//! Core functionality for TrainFriends - location sharing and proximity
//! alerts between friends. This crate provides the Rust implementation
//! for core TrainFriends operations.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![deny(unsafe_code)]

pub mod api;
mod app;
pub mod auth;
pub mod device;
pub mod location;
pub mod prefs;

pub use app::{CoreConfig, TrainFriendsCore};
