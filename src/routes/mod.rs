pub mod admin;

pub mod auth;

pub mod conductor;

pub mod frontend;

pub mod portal;

pub mod public;

pub use admin::configure_admin_routes;
pub use auth::configure_auth_routes;
pub use conductor::configure_conductor_routes;
pub use frontend::configure_frontend_routes;
pub use portal::configure_portal_routes;
pub use public::configure_public_routes;
