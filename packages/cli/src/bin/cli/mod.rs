pub mod baselines;
pub mod projects;
pub mod utils;
