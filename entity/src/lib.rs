//! Table mappings for departments and employees.

pub mod department;
pub mod employee;
