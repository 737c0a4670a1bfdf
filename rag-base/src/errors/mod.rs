pub mod rag_base_error;

pub use rag_base_error::RagBaseError;
