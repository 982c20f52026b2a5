pub mod http_api;
pub mod session;

pub use http_api::{authenticate, pick_first, points_window, BearerToken, UplinkClient};
pub use session::Session;
