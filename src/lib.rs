pub mod model;
pub mod pool;
pub mod schedule;
pub mod scheduler;
