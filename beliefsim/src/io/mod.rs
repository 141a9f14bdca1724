pub mod cohorts;
pub mod matrix;
pub mod presets;
pub mod report;
pub mod scenario;
