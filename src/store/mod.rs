pub mod memory;
pub mod postgres;
pub mod request_counter;
pub mod traits;

pub use memory::*;
pub use postgres::*;
pub use request_counter::*;
pub use traits::*;
