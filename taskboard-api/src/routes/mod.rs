/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `users`: User list/create/delete
/// - `tasks`: Task list/create/update/delete

pub mod health;
pub mod tasks;
pub mod users;
