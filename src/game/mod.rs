//! Game snapshots, annotations and the controller that drives a tree.

mod annotations;
mod controller;
mod options;
mod state;
mod store;

pub use annotations::{AnnotationColor, Annotations};
pub use controller::GameController;
pub use options::{GameOptions, OptionError};
pub use state::GameState;
pub use store::{GameStore, SharedGame};
