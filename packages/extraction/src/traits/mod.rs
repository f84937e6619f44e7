//! Core trait abstractions.

pub mod fetcher;
