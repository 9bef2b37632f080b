//! Note search.
//!
//! # Responsibility
//! - Filter the note collection by case-insensitive substring.
//! - Keep results lazy and in collection order.

pub mod substring;
