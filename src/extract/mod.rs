// src/extract/mod.rs
pub mod client;
pub mod response;

pub use client::ExtractClient;
pub use response::decode_elements;
