pub mod build;
pub mod compile;
pub mod new;
