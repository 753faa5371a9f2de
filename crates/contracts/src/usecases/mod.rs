pub mod common;
pub mod u501_fetch_manifests;
