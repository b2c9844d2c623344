//! Core module of the CSS engine, containing the style subsystem.
//!
//! This crate computes, for every element of an `html::Document`, the set of
//! properties declared for it by the document's `<style>` sheets and its own
//! `style` attribute. It is the computed-style oracle consulted when styles are
//! inlined.

pub mod adapter;
pub mod sheets;
mod style;
pub mod style_model;
pub mod types;

pub use style::StyleComputer;
pub use style_model::{ComputedStyleSet, StyleSnapshot};
