pub mod backup;
pub mod coordinator;
pub mod engine;
pub mod log;
pub mod recovery;
pub mod services;
pub mod sound;
