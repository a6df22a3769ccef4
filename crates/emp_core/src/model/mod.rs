//! Employee domain model.
//!
//! # Responsibility
//! - Define the record shapes core reads from and writes to `emp`.

pub mod emp;
