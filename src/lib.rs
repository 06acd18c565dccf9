// src/lib.rs
pub mod banner;
pub mod clipboard;
pub mod config;
pub mod controller;
pub mod errors;
pub mod form;
pub mod preset;
pub mod progress;
pub mod response;
pub mod snapshot;
pub mod terminal;
pub mod transport;
pub mod ui;
