// HTTP routes
pub mod health;
pub mod service_info;
pub mod substitutions;
pub mod update;

pub use health::*;
pub use service_info::*;
pub use substitutions::*;
pub use update::*;
