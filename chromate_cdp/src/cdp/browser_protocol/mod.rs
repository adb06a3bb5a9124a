pub mod browser;
pub mod fetch;
pub mod network;
pub mod page;
pub mod storage;
pub mod target;
