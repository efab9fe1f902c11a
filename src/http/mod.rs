pub mod app_server;
pub mod controllers;
pub mod error;
pub mod models;
