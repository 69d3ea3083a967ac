pub mod chat_stream;
pub mod config;
pub mod controller;
pub mod credentials;
pub mod export;
pub mod message;
pub mod models;
pub mod persona;
pub mod session;
