//! Light Integration Test Modules

pub mod intersection;
pub mod observers;
