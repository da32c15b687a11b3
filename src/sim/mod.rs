pub mod combat;
pub mod event;
pub mod narrator;
pub mod spawn;
pub mod step;
pub mod world;
