//! Session-level tests
//!
//! Scripted containers drive the full session loop:
//! - Stream selection and packet routing
//! - Discard and exclusion filtering
//! - Cooperative cancellation
//! - Failure notification and handle release
//! - Real files through libavformat, when test media is present

pub mod fixtures;
