//! Core library for the HLB client.
//!
//! HLB ("High/Low/Buffalo") is a social journaling service: users share
//! daily reflections with friends and with groups called herds. This crate
//! holds everything a front end needs to talk to the HLB API:
//!
//! - `auth`: the session store and bearer-token persistence
//! - `routing`: route table, navigation history and the route guard
//! - `api`: REST client for the auth and notification endpoints
//! - `notify`: user-facing notices emitted by session operations
//! - `config`: on-disk configuration with environment overrides

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod notify;
pub mod routing;
pub mod utils;
