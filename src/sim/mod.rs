pub mod env;
pub mod event;
pub mod level;
pub mod lifecycle;
pub mod snapshot;
pub mod step;
pub mod world;
