pub mod guard;
pub mod route;

pub use guard::{Navigation, SessionGuard, SessionState};
pub use route::Route;
