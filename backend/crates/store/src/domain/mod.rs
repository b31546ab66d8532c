//! Domain Layer

pub mod entity;
pub mod gateway;
pub mod pricing;
pub mod repository;
