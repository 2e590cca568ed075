pub mod table;
pub use table::KmerTable;

pub mod windows;

pub mod groups;

pub mod blosum;
pub use blosum::Blosum;

pub mod indexer;
pub use indexer::{Neighborhood, index_with_locations, component_xmers};
