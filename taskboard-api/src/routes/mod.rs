/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health probe endpoint
/// - `auth`: Authentication endpoints (register, login)
/// - `tasks`: Task CRUD and reorder endpoints

pub mod auth;
pub mod health;
pub mod tasks;
