//! Tracksvc - placeholder services for a free music platform
//!
//! This library provides three independent HTTP services: a track search
//! aggregator, an audio fingerprint check and a track recommender. Each one
//! answers with static data until the real backends exist.

/// Service configuration read from the environment
pub mod config;
/// Router assembly and the HTTP serve loop
pub mod server;
/// HTTP services, their entities and errors
pub mod services;
