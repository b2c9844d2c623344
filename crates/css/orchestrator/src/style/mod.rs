//! Style computation and cascade resolution for CSS properties.
//!
//! This module matches the author stylesheets of a document against its
//! elements, cascades the matched declarations together with each element's
//! `style` attribute, and normalizes color-valued properties through an
//! injected `ColorParser`.

mod cascade;

pub use cascade::StyleComputer;
