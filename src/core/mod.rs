/*!
 * Core Module
 * Shared types, limits, and error taxonomy
 */

pub mod errors;
pub mod limits;
pub mod types;
