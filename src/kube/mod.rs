mod file;
mod graph;
mod http;
pub mod identity;
mod source;

#[cfg(test)]
pub(crate) mod testing;

pub use file::FileSource;
pub use graph::{GraphSnapshot, GroupKey, GroupSummary, ResourceEdge, ResourceNode};
pub use http::HttpSource;
pub use identity::ResourceIdentity;
pub use source::{ClusterId, FetchError, ResourceSource};
