//! Web page capture client.
//!
//! A small desktop form that sends a URL and an output format (PNG or PDF) to a
//! capture service at `POST /api/capture` and saves the returned file.

pub mod api;
pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod logging;
pub mod ui;
pub mod utils;
