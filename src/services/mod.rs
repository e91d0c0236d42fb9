pub mod catalog_store;
pub use catalog_store::{CatalogError, CatalogStore};

pub mod catalog_store_impl;
pub use catalog_store_impl::SeaOrmCatalogStore;

pub mod log_store;
pub use log_store::{LogError, LogStore};

pub mod log_store_impl;
pub use log_store_impl::MongoLogStore;

pub mod memory;
pub use memory::{InMemoryCatalogStore, InMemoryLogStore};

pub mod search;
pub use search::{
    GenreSearchContext, HealthReport, SearchConsole, SearchError, SearchOutcome, SearchService,
};

pub mod stats;

pub mod validation;
pub use validation::ValidationError;
