pub mod id;
pub mod error;
pub mod graph;
pub mod literal;
pub mod gfd;
pub mod format;

// Re-export commonly used types
pub use id::VertexId;
pub use error::CoreError;
pub use graph::{AttributedGraph, Edge, Vertex, LABEL_ATTRIBUTE};
pub use literal::{literal_value, literals_satisfied, Literal, Token};
pub use gfd::Gfd;
pub use format::{read_gfd, read_gfd_file, read_graph, read_graph_file, write_gfd, write_graph};
