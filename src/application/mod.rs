pub mod scheduler;
pub mod service;
