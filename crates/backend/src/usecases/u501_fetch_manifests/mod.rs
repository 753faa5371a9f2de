pub mod executor;
pub mod liaison_api_client;
pub mod snapshot;

pub use executor::FetchExecutor;
pub use snapshot::ManifestStore;
