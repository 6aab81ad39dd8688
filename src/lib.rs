// src/lib.rs

//! Wiki catalog image archiver library.

pub mod document;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;

#[cfg(test)]
mod testing;
