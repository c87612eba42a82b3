//! EV charging station console.
//!
//! A server-rendered admin console over a remote stations table: list and
//! filter stations, create, edit and delete them, and browse a placeholder
//! map.

pub mod cache;
pub mod config;
pub mod domain;
pub mod filter;
pub mod form;
pub mod notify;
pub mod repository;
pub mod shell;
pub mod store;
pub mod web;
