//! TaskFlow: a single-user task manager for the terminal.
//!
//! State lives in two containers owned by [`app::App`]: [`auth::AuthStore`]
//! for the signed-in user and [`store::TaskStore`] for tasks and categories.
//! [`views`] derives filtered lists and the calendar grid from them.

pub mod app;
pub mod auth;
pub mod category;
pub mod clock;
pub mod config;
pub mod error;
pub mod forms;
pub mod ids;
pub mod logging;
pub mod report;
pub mod routes;
pub mod scheduler;
pub mod seed;
pub mod store;
pub mod task;
pub mod ui;
pub mod views;
