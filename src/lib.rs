//! # pubmetrics
//!
//! PubMed publication scraping with SCImago journal-metrics enrichment.
//!
//! ## Modules
//!
//! - [`fetch`] - HTTP document fetching
//! - [`pubmed`] - Publication search and article-page extraction
//! - [`scimago`] - Journal h-index and impact-factor lookups
//! - [`researcher`] - Record accumulation and rendering
//! - [`batch`] - Sequential batch driver
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pubmetrics::batch::{self, BatchOptions};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let options = BatchOptions {
//!         input: "authors.txt".into(),
//!         output: "metrics.txt".into(),
//!         search: Default::default(),
//!     };
//!     batch::run(&options).await?;
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod error;
pub mod fetch;
pub mod pubmed;
pub mod researcher;
pub mod scimago;

pub use error::{PubmetricsError, Result};
