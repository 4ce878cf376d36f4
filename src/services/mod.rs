pub mod assignment_service;
pub mod month_service;
pub mod planning_service;
pub mod week_grid;
