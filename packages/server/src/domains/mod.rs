// Business domains
pub mod substitutions;
