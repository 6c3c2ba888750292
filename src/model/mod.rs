//! The semantic model (spec.md §3): the typed entity families an `Engine`
//! tracks, plus the cascade/equivalence logic for each.

pub mod engine;
pub mod font_face;
pub mod keyframes;
pub mod page;
pub mod selector_entry;
pub mod supports;

pub use engine::Engine;
