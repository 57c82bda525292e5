//! Per-author publication accumulation and record rendering.
//!
//! One [`Researcher`] lives for one input line: records are appended in
//! discovery order (the search site's own date-descending sort, inherited
//! unmodified) and written out as pipe-delimited lines.

use crate::pubmed::{Article, AuthorRole};
use crate::scimago::JournalMetrics;
use serde::{Deserialize, Serialize};

/// Field delimiter of rendered records
pub const FIELD_DELIMITER: &str = "|";

/// Number of fields in a rendered record
pub const FIELD_COUNT: usize = 9;

/// One scraped article joined with its journal metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicationRecord {
    /// Article title
    pub title: String,
    /// Publication date
    pub date: String,
    /// The searched author's byline display name
    pub author_name: String,
    /// Byline in `Last, F` form
    pub authors: Vec<String>,
    /// The searched author's byline role
    pub role: AuthorRole,
    /// Journal name
    pub journal: String,
    /// Journal impact factor, or `N/A`
    pub impact_factor: String,
    /// Journal h-index, or `N/A`
    pub h_index: String,
}

impl PublicationRecord {
    /// Join an extracted article with its resolved journal metrics.
    pub fn new(article: Article, metrics: JournalMetrics) -> Self {
        Self {
            title: article.title,
            date: article.date,
            author_name: article.author_name,
            authors: article.authors,
            role: article.role,
            journal: article.journal,
            impact_factor: metrics.impact_factor,
            h_index: metrics.h_index,
        }
    }

    /// Render as `title|date|name|authors|role|citations|journal|impact|h-index`.
    ///
    /// Field values are not escaped; a delimiter inside a value shifts the
    /// columns (accepted limitation). The citation count field is never
    /// populated.
    pub fn render(&self) -> String {
        let authors = format!("{:?}", self.authors);
        [
            self.title.as_str(),
            self.date.as_str(),
            self.author_name.as_str(),
            authors.as_str(),
            self.role.as_str(),
            "",
            self.journal.as_str(),
            self.impact_factor.as_str(),
            self.h_index.as_str(),
        ]
        .join(FIELD_DELIMITER)
    }
}

/// A researcher's accumulated publication records, in insertion order.
///
/// No deduplication and no sorting; discarded after its records are written.
#[derive(Debug, Default)]
pub struct Researcher {
    publications: Vec<String>,
}

impl Researcher {
    /// Create an empty researcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one rendered record line.
    pub fn add_publication(&mut self, record: &PublicationRecord) {
        self.publications.push(record.render());
    }

    /// Rendered record lines, in insertion order.
    pub fn publications(&self) -> &[String] {
        &self.publications
    }

    /// Number of accumulated records.
    pub fn len(&self) -> usize {
        self.publications.len()
    }

    /// True when no records have been accumulated.
    pub fn is_empty(&self) -> bool {
        self.publications.is_empty()
    }
}
