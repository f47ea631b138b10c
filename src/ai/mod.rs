//! Outbound client for the AI completion API used by text extraction.

pub mod client;

pub use client::CompletionClient;
