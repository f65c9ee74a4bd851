pub mod app;
pub mod core;
pub mod light;
pub mod queue;
pub mod sim;
