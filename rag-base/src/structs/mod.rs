pub mod fragment;
pub mod rag_base_config;
