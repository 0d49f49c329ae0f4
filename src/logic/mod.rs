pub mod catalog;
pub mod collection_workflow;
pub mod error;
pub mod movie_listing;
pub mod registration;

pub use catalog::*;
pub use collection_workflow::*;
pub use error::*;
pub use movie_listing::*;
pub use registration::*;
