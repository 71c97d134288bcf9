pub mod calendar_math;
pub mod clock_geometry;
