//! Persistence collaborators for the overlay document.
//!
//! # Responsibility
//! - Define the load/replace-wholesale contract used by the overlay service.
//! - Keep SQLite details out of the pure engine and the service layer.
//!
//! # Invariants
//! - A failed save leaves the previously stored document untouched.

pub mod overlay_repo;
