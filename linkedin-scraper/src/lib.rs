pub mod linkedin;
pub mod session;

pub use linkedin::types::{Job, SearchResults};
