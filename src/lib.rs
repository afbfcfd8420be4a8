//! vellum: a terminal documentation browser.
//!
//! Section templates are parsed from markdown into content trees. The controller in
//! [`app_state`] mounts one at a time, builds its table of contents, searches every section as
//! the reader types and highlights the active query inside the mounted content.

#![allow(clippy::multiple_crate_versions)]

pub mod app_state;
pub mod clipboard;
pub mod config;
pub mod content;
pub mod error;
pub mod event;
pub mod formats;
pub mod highlight;
pub mod input;
pub mod location;
pub mod logging;
pub mod render;
pub mod search;
pub mod section;
pub mod storage;
pub mod store;
pub mod theme;
pub mod toc;
pub mod ui;

pub use error::{Error, Result};
