pub mod backward_pass;
pub mod critical;
pub mod forward_pass;
pub mod paths;

pub use critical::{CRITICAL_EPSILON, CriticalActivity, CriticalPath, solve};
pub use paths::enumerate_critical_paths;
