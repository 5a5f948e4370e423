//! `taskdeck`: terminal client for a remote task-tracking service.

pub mod api;
pub mod app;
pub mod card;
pub mod config;
pub mod controller;
pub mod detail;
pub mod editor;
pub mod filter;
pub mod net;
pub mod ui;
