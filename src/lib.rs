pub mod config;
pub mod ipc;
pub mod logging;
pub mod model;
pub mod report;
pub mod roster;
