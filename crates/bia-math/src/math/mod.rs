//! Core math modules.

pub mod beta;
pub mod descriptive;
pub mod regression;
pub mod spectral;
pub mod stable;
pub mod student_t;
