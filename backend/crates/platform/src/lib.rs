//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Password hashing (Argon2id, NIST SP 800-63B compliant)
//! - Cookie management
//! - Injected cache port with no-op and in-memory implementations

pub mod cache;
pub mod cookie;
pub mod password;
