//! SCImago journal-rank lookups.
//!
//! Resolves a journal name to its h-index and the impact factor for a target
//! publication year. The public lookup is total: any failure along the way
//! (journal not found, unexpected page layout, empty impact table) degrades
//! to the `N/A` sentinel pair instead of an error.

use crate::error::{OptionExt, PubmetricsError, Result};
use crate::fetch::Fetcher;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

/// SCImago base URL
pub const SCIMAGO_BASE_URL: &str = "https://www.scimagojr.com/";

/// Sentinel rendered when a journal cannot be matched on the ranking site
pub const UNRESOLVED: &str = "N/A";

/// Journal-level metrics resolved for one publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalMetrics {
    /// Impact factor for the matched year, or the closest available
    pub impact_factor: String,
    /// Cumulative h-index figure (not year-specific)
    pub h_index: String,
}

impl JournalMetrics {
    /// The `("N/A", "N/A")` sentinel pair.
    pub fn unresolved() -> Self {
        Self {
            impact_factor: UNRESOLVED.to_string(),
            h_index: UNRESOLVED.to_string(),
        }
    }
}

/// Look up a journal's h-index and the impact factor closest to `year`.
///
/// Returns the sentinel pair if the journal is not found or the lookup fails.
pub async fn lookup(fetcher: &Fetcher, journal: &str, year: &str) -> JournalMetrics {
    match resolve(fetcher, journal, year).await {
        Ok(Some(metrics)) => metrics,
        Ok(None) => {
            debug!(journal, "journal not found on ranking site");
            JournalMetrics::unresolved()
        }
        Err(e) => {
            warn!(journal, error = %e, "journal metrics lookup failed");
            JournalMetrics::unresolved()
        }
    }
}

/// Internal resolution: search, follow the first hit, read the detail page.
///
/// `Ok(None)` means the search produced no result link.
async fn resolve(fetcher: &Fetcher, journal: &str, year: &str) -> Result<Option<JournalMetrics>> {
    let html = fetcher.get(&search_url(journal)?).await?;

    let Some(href) = parse_search_page(&html)? else {
        return Ok(None);
    };

    let detail_url = base_url()?
        .join(&href)
        .map_err(|e| PubmetricsError::Parse(format!("bad journal link {href:?}: {e}")))?;
    let html = fetcher.get(&detail_url).await?;

    parse_journal_page(&html, year).map(Some)
}

fn base_url() -> Result<Url> {
    Url::parse(SCIMAGO_BASE_URL)
        .map_err(|e| PubmetricsError::Config(format!("invalid ranking base URL: {e}")))
}

fn search_url(journal: &str) -> Result<Url> {
    let mut url = base_url()?
        .join("journalsearch.php")
        .map_err(|e| PubmetricsError::Config(format!("invalid ranking search URL: {e}")))?;
    url.query_pairs_mut().append_pair("q", journal);
    Ok(url)
}

/// First result link from a ranking search page, if any.
fn parse_search_page(html: &str) -> Result<Option<String>> {
    let document = Html::parse_document(html);

    let results_selector = selector("div.search_results")?;
    let link_selector = selector("a")?;

    let results = document
        .select(&results_selector)
        .next()
        .ok_or_parse("search results block not found")?;

    Ok(results
        .select(&link_selector)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string))
}

/// Read the h-index figure and year-matched impact factor from a journal page.
fn parse_journal_page(html: &str, year: &str) -> Result<JournalMetrics> {
    let document = Html::parse_document(html);

    let hindex_selector = selector("div.hindexnumber")?;
    let h_index = document
        .select(&hindex_selector)
        .next()
        .ok_or_parse("h-index figure not found")?
        .text()
        .collect::<String>();

    let impact_factor = impact_for_year(&impact_rows(&document)?, year)?;

    Ok(JournalMetrics {
        impact_factor,
        h_index,
    })
}

/// Row texts of the year-by-year impact table, in document order.
fn impact_rows(document: &Html) -> Result<Vec<String>> {
    let cell_selector = selector("div.cell1x1.dynamiccell")?;
    let row_selector = selector("table tr")?;

    let cell = document
        .select(&cell_selector)
        .next()
        .ok_or_parse("impact factor table not found")?;

    Ok(cell
        .select(&row_selector)
        .map(|row| row.text().collect::<String>())
        .collect())
}

/// Select the impact value for `year` from rows of `<year><value>` text.
///
/// The first row whose leading four characters equal the target year wins;
/// with no match the last row's value is used. The value is the row text
/// after those four characters.
fn impact_for_year(rows: &[String], year: &str) -> Result<String> {
    let last = rows
        .last()
        .ok_or_else(|| PubmetricsError::Metrics("impact factor table has no rows".to_string()))?;

    for row in rows {
        if row.chars().take(4).eq(year.chars()) {
            return Ok(row.chars().skip(4).collect());
        }
    }

    Ok(last.chars().skip(4).collect())
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| PubmetricsError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const JOURNAL_HTML: &str = r#"<html><body>
        <div class="hindexnumber">432</div>
        <div class="cell1x1 dynamiccell"><table>
            <tr><td>2018</td><td>11.880</td></tr>
            <tr><td>2019</td><td>12.121</td></tr>
            <tr><td>2020</td><td>14.919</td></tr>
        </table></div>
    </body></html>"#;

    #[test]
    fn test_search_url_encodes_journal_name() {
        let url = search_url("Nat Commun").expect("failed to build URL");
        assert_eq!(
            url.as_str(),
            "https://www.scimagojr.com/journalsearch.php?q=Nat+Commun"
        );
    }

    #[test]
    fn test_parse_search_page_first_link() {
        let html = r#"<div class="search_results">
            <a href="journalsearch.php?q=21100829277&tip=sid"><span>Nature Communications</span></a>
            <a href="journalsearch.php?q=12345&tip=sid"><span>Other</span></a>
        </div>"#;
        let href = parse_search_page(html).expect("parse failed");
        assert_eq!(
            href.as_deref(),
            Some("journalsearch.php?q=21100829277&tip=sid")
        );
    }

    #[test]
    fn test_parse_search_page_no_link() {
        let html = r#"<div class="search_results"><p>No results</p></div>"#;
        let href = parse_search_page(html).expect("parse failed");
        assert_eq!(href, None);
    }

    #[test]
    fn test_parse_search_page_missing_block() {
        let result = parse_search_page("<html><body></body></html>");
        assert!(matches!(result, Err(PubmetricsError::Parse(_))));
    }

    #[test]
    fn test_parse_journal_page_matches_year() {
        let metrics = parse_journal_page(JOURNAL_HTML, "2019").expect("parse failed");
        assert_eq!(metrics.h_index, "432");
        assert_eq!(metrics.impact_factor, "12.121");
    }

    #[test]
    fn test_parse_journal_page_falls_back_to_last_row() {
        let metrics = parse_journal_page(JOURNAL_HTML, "2009").expect("parse failed");
        assert_eq!(metrics.impact_factor, "14.919");
    }

    #[test]
    fn test_impact_for_year_empty_table() {
        let result = impact_for_year(&[], "2019");
        assert!(matches!(result, Err(PubmetricsError::Metrics(_))));
    }

    #[test]
    fn test_impact_for_year_empty_target() {
        let rows = vec!["20183.210".to_string(), "20193.456".to_string()];
        assert_eq!(impact_for_year(&rows, "").expect("match failed"), "3.456");
    }

    #[test]
    fn test_unresolved_sentinel() {
        let metrics = JournalMetrics::unresolved();
        assert_eq!(metrics.impact_factor, "N/A");
        assert_eq!(metrics.h_index, "N/A");
    }
}
