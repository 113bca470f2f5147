//! # Taskbox API Server
//!
//! A minimal multi-user task-tracking HTTP API. Users register and log in,
//! then manage a private list of tasks (create, list, update, mark done,
//! delete). Every task is visible only to its owner.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `db`: Database pool and migrations
//! - `error`: Error handling and HTTP response mapping
//! - `auth`: Password hashing, session tokens, bearer-token middleware
//! - `models`: Database models (users, tasks)
//! - `routes`: API route handlers

pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
