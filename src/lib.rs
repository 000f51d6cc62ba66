//! Profit calculator for crafting Oathplate armour from Infernal shale and
//! Oathplate shards, with live prices from the OSRS wiki and a terminal
//! dashboard.

pub mod app;
pub mod config;
pub mod domain;
pub mod infra;
pub mod ui;
pub mod util;

pub use app::{App, AppEvent};
pub use config::AppConfig;
