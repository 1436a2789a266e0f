//! Skin engine for an embeddable media-player widget.
//!
//! A skin is a bundle of markup, style and behavior living under one base
//! path. [`SkinController`] grafts it into a shared [`Page`] in place of a
//! placeholder element, routes host input on the skin's controls to a
//! [`PlayerEngine`], and re-renders the skin as the engine publishes events.

pub mod config;
pub mod controller;
pub mod dom;
pub mod engine;
pub mod error;
pub mod logging;
pub mod model;
pub mod page;
pub mod skin;
pub mod view;

pub use config::Config;
pub use controller::{Command, ControlEventRouter, InputEvent, InputOutcome, SkinController, StateSync};
pub use engine::{PlayerEngine, PlayerEvent, PlayerEventChannel};
pub use error::SkinError;
pub use page::{Page, SharedPage};
