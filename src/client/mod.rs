// Fetch collaborator: trait seam plus the reqwest implementation.

pub mod fetcher;
pub mod traits;

pub use fetcher::ApiClient;
pub use traits::PriceSource;
