pub mod errors;
pub mod filters;
pub mod languages;
pub mod models;
pub mod ports;
pub mod scheduler;
pub mod session;
pub mod stats;
pub mod store;

pub use errors::*;
pub use filters::*;
pub use languages::*;
pub use models::*;
pub use ports::*;
pub use scheduler::*;
pub use session::*;
pub use stats::*;
pub use store::*;
