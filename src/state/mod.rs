/// State management module
///
/// This module handles all application state, including:
/// - The read-only food dataset and its readiness (library.rs)
/// - Shared data structures (data.rs)
/// - Display units of the current search and their pictures (session.rs)

pub mod data;
pub mod library;
pub mod session;
