pub mod entities;
pub mod requests;
pub mod responses;

pub use entities::{Area, PortalSubject, SessionUser};
pub use requests::LoginRequest;
pub use responses::LoginResponse;
