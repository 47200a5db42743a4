pub mod app;
pub mod config;
pub mod events;
pub mod layout;
pub mod output;
pub mod sys;
