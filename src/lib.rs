//! Turns a feature description into user stories, engineering tasks and
//! risks by way of an LLM, and keeps a small local history of the results.

pub mod contexts;
pub mod data;
pub mod logging;
pub mod registries;
pub mod server;
