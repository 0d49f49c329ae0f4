pub mod collection;
pub mod common;
pub mod movie;
pub mod user;

pub use collection::*;
pub use common::*;
pub use movie::*;
pub use user::*;
