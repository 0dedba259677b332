pub mod job;
pub mod transcode;
pub mod upload;
