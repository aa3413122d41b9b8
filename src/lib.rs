#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod events;
pub mod mutation;
pub mod overlay;
pub mod session;
pub mod store;
pub mod viewport;

pub mod theme;
pub mod ui;
pub mod ui_state;
