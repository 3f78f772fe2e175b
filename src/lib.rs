pub mod board;
pub mod config;
pub mod document_store;
pub mod errors;
pub mod handler;
pub mod league;
pub mod model;
pub mod playback;
pub mod priority;
pub mod schedule;
pub mod store;
