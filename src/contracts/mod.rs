pub mod badge;
pub mod orchestrator;
pub mod responses;
pub mod summary;

use crate::api::ApiClient;
use crate::cache::QueryCache;

/// Contract workflows: generation, dispatch, lifecycle and date responses.
///
/// Every mutation is a single backend call followed by cache invalidation.
#[derive(Clone)]
pub struct ContractService {
    api: ApiClient,
    cache: QueryCache,
}

impl ContractService {
    pub fn new(api: ApiClient, cache: QueryCache) -> Self {
        Self { api, cache }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }
}
