pub mod request;
pub mod response;

pub use request::FetchRequest;
pub use response::{FetchError, FetchResponse, FetchRunStatus, FetchStatus};

use crate::usecases::common::UseCaseMetadata;

pub struct FetchManifests;

impl UseCaseMetadata for FetchManifests {
    fn usecase_index() -> &'static str {
        "u501"
    }

    fn usecase_name() -> &'static str {
        "fetch_manifests"
    }

    fn display_name() -> &'static str {
        "Загрузка манифестов доставки"
    }

    fn description() -> &'static str {
        "Загрузка манифестов по филиалам из liaison-сервиса через API"
    }
}
