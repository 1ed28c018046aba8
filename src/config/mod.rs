mod app;
mod env;
mod roster;

pub use app::*;
pub use roster::*;
