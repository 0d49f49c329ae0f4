pub mod movie_source;

pub use movie_source::*;
