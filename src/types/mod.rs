pub mod fix;
mod lenient;
pub mod marker;
pub mod mode;
pub mod route;
pub mod snapshot;
