pub mod handlers;
pub mod routes;

pub use handlers::not_found_handler;
pub use routes::create_http_routes;
