pub mod collection_handlers;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod user_handlers;

pub use collection_handlers::*;
pub use extractors::*;
pub use handlers::*;
pub use routes::*;
pub use user_handlers::*;
