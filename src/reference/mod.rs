pub mod client;

pub use client::ReferenceClient;
