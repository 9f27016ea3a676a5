//! Numeric primitives shared by the bi-analytics engine.

pub mod math;

pub use math::beta::*;
pub use math::descriptive::*;
pub use math::regression::*;
pub use math::spectral::*;
pub use math::stable::*;
pub use math::student_t::*;
