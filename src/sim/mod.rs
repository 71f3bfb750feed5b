pub mod catalog;
pub mod event;
pub mod game;
pub mod ranking;
pub mod selection;
pub mod session;
pub mod timer;
pub mod world;
