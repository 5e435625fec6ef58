//! Backend for a small demo bank: registration, cookie-based login and a
//! pair of read endpoints over the account.

pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod state;
