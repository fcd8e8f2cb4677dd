//! Weekly class schedule viewer for a course-planning backend.
//!
//! [`layout`] is the pure timeline layout engine; [`api`] talks to the backend;
//! [`ui`] is the egui shell that ties them together.

pub mod api;
pub mod config;
pub mod layout;
pub mod ui;
