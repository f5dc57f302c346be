pub mod endpoints;
pub mod fetcher;
pub mod models;
pub mod transport;

pub use endpoints::*;
pub use fetcher::*;
pub use transport::*;
