pub mod assignment;
pub mod calendar;
