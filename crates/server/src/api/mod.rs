pub mod handlers;
pub mod middleware;
pub mod podcasts;
pub mod routes;

pub use routes::{build_cors_layer, create_router};
