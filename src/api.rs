pub mod client;
pub mod kcwater;

pub use self::kcwater::{DEFAULT_BASE_URL, Session};
