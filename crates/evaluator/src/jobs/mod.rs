mod fetcher_impls;
mod fetcher_traits;
mod ingestion_jobs;

pub use fetcher_traits::*;
pub use ingestion_jobs::*;
