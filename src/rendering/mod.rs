pub mod cards;
pub mod views;

pub use cards::{CardView, FatalRenderer, Render, StandardRenderer, renderer_for};
pub use views::{CounterView, LogView, Snapshot};
