pub mod encoder;
pub mod notify;
pub mod storage;
