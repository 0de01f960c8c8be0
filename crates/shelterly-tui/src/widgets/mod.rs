//! Shared rendering helpers.

pub mod input;
pub mod sub_tabs;
