//! Region-scoped PokeAPI catalog browser
//!
//! The library holds the browsing core (session, search, navigation and
//! evolution resolution) and the tui-dispatch store around it; `main.rs`
//! wires it to the terminal.

pub mod action;
pub mod api;
pub mod catalog;
pub mod config;
pub mod effect;
pub mod error;
pub mod evolution;
pub mod logging;
pub mod navigator;
pub mod reducer;
pub mod search;
pub mod session;
pub mod source;
pub mod state;
pub mod ui;
