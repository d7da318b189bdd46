/// Track search aggregator
pub mod aggregator;
/// Response and request entities shared by the services
pub mod entities;
/// Error types and result aliases
pub mod errors;
/// Audio fingerprint check
pub mod fingerprint;
/// Similar-track recommender
pub mod recommender;

pub use fingerprint::UploadState;
