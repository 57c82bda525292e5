//! PubMed search and article-page extraction.
//!
//! Builds the author search query, enumerates result links, and extracts the
//! bibliographic fields from an article page: title, journal, date, byline
//! and the searched author's position in it. Every field has a named selector
//! rule; a missing block is a parse error scoped to that single article.

use crate::error::{OptionExt, PubmetricsError, Result};
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use url::Url;

/// PubMed search endpoint (classic interface)
pub const SEARCH_URL: &str = "https://www.ncbi.nlm.nih.gov/pubmed/";

/// Base URL for per-article detail pages
pub const ARTICLE_BASE_URL: &str = "https://pubmed.ncbi.nlm.nih.gov/";

/// A researcher's name as read from the input list (`Last, First`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorName {
    /// Family name
    pub last: String,
    /// Given name
    pub first: String,
}

impl AuthorName {
    /// Parse one `Last, First` input line.
    ///
    /// # Errors
    ///
    /// Returns a parse error for lines without the comma-space separator or
    /// with an empty half; the driver skips such authors.
    pub fn parse(line: &str) -> Result<Self> {
        let mut parts = line.trim().splitn(2, ", ");
        match (parts.next(), parts.next()) {
            (Some(last), Some(first)) if !last.is_empty() && !first.is_empty() => Ok(Self {
                last: last.to_string(),
                first: first.to_string(),
            }),
            _ => Err(PubmetricsError::Parse(format!(
                "malformed author line: {line:?}"
            ))),
        }
    }
}

/// Query options for the publication search
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// First publication year included in the filter
    pub year_from: u16,
    /// Last publication year included in the filter
    pub year_to: u16,
    /// Maximum number of results requested
    pub size: u32,
    /// Custom base URL overriding [`SEARCH_URL`]
    pub base_url: Option<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            year_from: 2011,
            year_to: 2020,
            size: 200,
            base_url: None,
        }
    }
}

/// Build the publication search URL for one author.
///
/// The term is `Last, First[Author]`; apostrophes in names are folded to
/// spaces, which the site's own search form does as well.
pub fn search_url(author: &AuthorName, options: &SearchOptions) -> Result<Url> {
    let base = options.base_url.as_deref().unwrap_or(SEARCH_URL);
    let mut url = Url::parse(base)
        .map_err(|e| PubmetricsError::Config(format!("invalid search base URL: {e}")))?;

    let term = format!(
        "{}, {}[Author]",
        author.last.replace('\'', " "),
        author.first.replace('\'', " ")
    );

    url.query_pairs_mut()
        .append_pair("term", &term)
        .append_pair(
            "filter",
            &format!("years.{}-{}", options.year_from, options.year_to),
        )
        .append_pair("sort", "date")
        .append_pair("size", &options.size.to_string());

    Ok(url)
}

/// Extract the article links from a search results page, in document order.
pub fn parse_search_results(html: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);

    let entry_selector = selector("div.docsum-content")?;
    let link_selector = selector("a")?;

    let mut links = Vec::new();
    for entry in document.select(&entry_selector) {
        if let Some(href) = entry
            .select(&link_selector)
            .next()
            .and_then(|a| a.value().attr("href"))
        {
            links.push(href.to_string());
        }
    }

    Ok(links)
}

/// Resolve a search-result href against the article base URL.
pub fn article_url(href: &str) -> Result<Url> {
    Url::parse(ARTICLE_BASE_URL)
        .map_err(|e| PubmetricsError::Config(format!("invalid article base URL: {e}")))?
        .join(href)
        .map_err(|e| PubmetricsError::Parse(format!("bad article link {href:?}: {e}")))
}

/// Coarse classification of an author's position in a paper's byline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthorRole {
    /// First author
    First,
    /// Second author
    Second,
    /// Neither first, second, nor last
    Middle,
    /// Last author
    Last,
}

impl AuthorRole {
    /// Classify a 1-based byline position among `total` authors.
    ///
    /// Rules are checked in order: first, second, last, middle — so the sole
    /// author of a paper is `First` and the second of two is `Second`.
    pub fn classify(position: usize, total: usize) -> Self {
        match position {
            1 => Self::First,
            2 => Self::Second,
            p if p == total => Self::Last,
            _ => Self::Middle,
        }
    }

    /// Numeric code used in the output record.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::First => "1",
            Self::Second => "2",
            Self::Middle => "3",
            Self::Last => "4",
        }
    }
}

/// Everything extracted from one article page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Article title
    pub title: String,
    /// Journal name
    pub journal: String,
    /// Publication date, volume/issue suffix stripped
    pub date: String,
    /// Byline in `Last, F` form, in page order
    pub authors: Vec<String>,
    /// The searched author's byline role
    pub role: AuthorRole,
    /// Display name of the searched author as it appears in the byline;
    /// falls back to the bare given name when no byline entry matches
    pub author_name: String,
}

/// Extract the bibliographic fields from an article page.
///
/// # Arguments
///
/// * `html` - Raw HTML of the article detail page
/// * `author` - The searched author, matched against the byline by surname
///
/// # Errors
///
/// Returns a parse error when the heading, source block, or authors list is
/// absent; the driver logs the URL and skips the article.
pub fn parse_article(html: &str, author: &AuthorName) -> Result<Article> {
    let document = Html::parse_document(html);

    let title = extract_title(&document)?;
    let source = extract_source(&document)?;
    let byline = extract_byline(&document, &author.last)?;

    // an unmatched byline is reported as a first-author entry
    let role = AuthorRole::classify(byline.position.unwrap_or(1), byline.total);
    let author_name = byline.matched.unwrap_or_else(|| author.first.clone());

    Ok(Article {
        title,
        journal: source.journal,
        date: source.date,
        authors: byline.authors,
        role,
        author_name,
    })
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| PubmetricsError::Parse(e.to_string()))
}

fn extract_title(document: &Html) -> Result<String> {
    let heading_selector = selector("h1.heading-title")?;
    let text = document
        .select(&heading_selector)
        .next()
        .ok_or_parse("article heading not found")?
        .text()
        .collect::<String>();

    let line = text
        .lines()
        .find(|line| !line.trim().is_empty())
        .ok_or_parse("article heading is empty")?;

    // the first two characters are the markup's icon/label prefix
    Ok(line.chars().skip(2).collect())
}

#[derive(Debug, PartialEq, Eq)]
struct SourceFields {
    journal: String,
    date: String,
}

fn extract_source(document: &Html) -> Result<SourceFields> {
    let source_selector = selector("div.article-source")?;
    let text = document
        .select(&source_selector)
        .next()
        .ok_or_parse("article source block not found")?
        .text()
        .collect::<String>();

    parse_source_text(&text)
}

/// Split the source block into journal name and date.
///
/// The block reads `<journal> . <date>;<volume/issue/pages>`. Journal names
/// may contain spaces, so tokens accumulate until the lone `.` separator;
/// without one the whole block is the journal and the date is empty.
fn parse_source_text(text: &str) -> Result<SourceFields> {
    let mut tokens = text.split_whitespace();

    let mut journal = tokens
        .next()
        .ok_or_parse("article source block is empty")?
        .to_string();

    let mut tail: Vec<&str> = Vec::new();
    let mut seen_separator = false;
    for token in tokens {
        if seen_separator {
            tail.push(token);
        } else if token == "." {
            seen_separator = true;
        } else {
            journal.push(' ');
            journal.push_str(token);
        }
    }

    let date = tail
        .join(" ")
        .split(';')
        .next()
        .unwrap_or_default()
        .to_string();

    Ok(SourceFields { journal, date })
}

/// Outcome of scanning the byline for the searched author.
#[derive(Debug, Default)]
struct BylineScan {
    /// `Last, F` forms, in byline order
    authors: Vec<String>,
    /// 1-based candidate position of the searched author
    position: Option<usize>,
    /// Full display name of the matching entry
    matched: Option<String>,
    /// Total byline entries
    total: usize,
    /// Non-matching entries seen; feeds `position`
    skipped: usize,
}

fn extract_byline(document: &Html, surname: &str) -> Result<BylineScan> {
    let list_selector = selector("div.authors-list")?;
    let item_selector = selector("span.authors-list-item")?;
    let name_selector = selector("a.full-name")?;

    let list = document
        .select(&list_selector)
        .next()
        .ok_or_parse("authors list not found")?;

    let names = list.select(&item_selector).filter_map(|item| {
        item.select(&name_selector)
            .next()
            .map(|a| a.text().collect::<String>())
    });

    Ok(scan_byline(names, surname))
}

/// Fold over the byline entries, tracking the searched author's position.
///
/// Position counts the non-matching entries seen before a match, plus one;
/// a later match overwrites an earlier one.
fn scan_byline(names: impl Iterator<Item = String>, surname: &str) -> BylineScan {
    let surname = surname.to_lowercase();
    let mut scan = BylineScan::default();

    for full_name in names {
        scan.total += 1;
        scan.authors.push(abbreviate(&full_name));

        let matches = full_name
            .to_lowercase()
            .split(' ')
            .any(|word| word == surname);

        if matches {
            scan.position = Some(scan.skipped + 1);
            scan.matched = Some(full_name);
        } else {
            scan.skipped += 1;
        }
    }

    scan
}

/// `Jane Q Public` -> `Public, J`
fn abbreviate(full_name: &str) -> String {
    let family = full_name.split(' ').next_back().unwrap_or(full_name);
    match full_name.split(' ').next().and_then(|w| w.chars().next()) {
        Some(initial) => format!("{family}, {initial}"),
        None => family.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE_HTML: &str = r#"<html><body>
        <h1 class="heading-title">
X Dissecting regulatory networks in tumor cells
        </h1>
        <div class="article-source"><span class="cit">Nat Commun . 2019 Mar 4;10(1):1023 .</span></div>
        <div class="authors-list">
            <span class="authors-list-item"><a class="full-name">Jane Q Public</a></span>
            <span class="authors-list-item"><a class="full-name">John Smith</a></span>
            <span class="authors-list-item"><a class="full-name">Ada Lovelace</a></span>
        </div>
    </body></html>"#;

    #[test]
    fn test_parse_author_line() {
        let name = AuthorName::parse("Smith, John\n").expect("parse failed");
        assert_eq!(name.last, "Smith");
        assert_eq!(name.first, "John");
    }

    #[test]
    fn test_parse_author_line_malformed() {
        assert!(AuthorName::parse("Smith John").is_err());
        assert!(AuthorName::parse("").is_err());
    }

    #[test]
    fn test_build_search_url() {
        let author = AuthorName::parse("Smith, John").expect("parse failed");
        let url = search_url(&author, &SearchOptions::default()).expect("failed to build URL");
        assert!(url.as_str().contains("term=Smith%2C+John%5BAuthor%5D"));
        assert!(url.as_str().contains("filter=years.2011-2020"));
        assert!(url.as_str().contains("sort=date"));
        assert!(url.as_str().contains("size=200"));
    }

    #[test]
    fn test_search_url_folds_apostrophes() {
        let author = AuthorName::parse("O'Brien, Mary").expect("parse failed");
        let url = search_url(&author, &SearchOptions::default()).expect("failed to build URL");
        assert!(url.as_str().contains("term=O+Brien%2C+Mary%5BAuthor%5D"));
    }

    #[test]
    fn test_parse_search_results() {
        let html = r#"<html><body>
            <div class="docsum-content"><a href="/31000001/">First</a></div>
            <div class="docsum-content"><a href="/31000002/">Second</a></div>
        </body></html>"#;
        let links = parse_search_results(html).expect("parse failed");
        assert_eq!(links, vec!["/31000001/", "/31000002/"]);
    }

    #[test]
    fn test_parse_search_results_empty_page() {
        let links = parse_search_results("<html><body></body></html>").expect("parse failed");
        assert!(links.is_empty());
    }

    #[test]
    fn test_article_url_joins_relative_link() {
        let url = article_url("/31000001/").expect("join failed");
        assert_eq!(url.as_str(), "https://pubmed.ncbi.nlm.nih.gov/31000001/");
    }

    #[test]
    fn test_parse_article() {
        let author = AuthorName::parse("Smith, John").expect("parse failed");
        let article = parse_article(ARTICLE_HTML, &author).expect("parse failed");

        assert_eq!(article.title, "Dissecting regulatory networks in tumor cells");
        assert_eq!(article.journal, "Nat Commun");
        assert_eq!(article.date, "2019 Mar 4");
        assert_eq!(
            article.authors,
            vec!["Public, J", "Smith, J", "Lovelace, A"]
        );
        assert_eq!(article.role, AuthorRole::Second);
        assert_eq!(article.author_name, "John Smith");
    }

    #[test]
    fn test_parse_article_missing_heading() {
        let author = AuthorName::parse("Smith, John").expect("parse failed");
        let result = parse_article("<html><body></body></html>", &author);
        assert!(matches!(result, Err(PubmetricsError::Parse(_))));
    }

    #[test]
    fn test_parse_article_unmatched_author_falls_back() {
        let author = AuthorName::parse("Doe, Janet").expect("parse failed");
        let article = parse_article(ARTICLE_HTML, &author).expect("parse failed");
        assert_eq!(article.role, AuthorRole::First);
        assert_eq!(article.author_name, "Janet");
    }

    #[test]
    fn test_role_classification() {
        assert_eq!(AuthorRole::classify(1, 1), AuthorRole::First);
        assert_eq!(AuthorRole::classify(1, 5), AuthorRole::First);
        assert_eq!(AuthorRole::classify(2, 2), AuthorRole::Second);
        assert_eq!(AuthorRole::classify(2, 5), AuthorRole::Second);
        assert_eq!(AuthorRole::classify(5, 5), AuthorRole::Last);
        assert_eq!(AuthorRole::classify(3, 5), AuthorRole::Middle);
    }

    #[test]
    fn test_role_codes() {
        assert_eq!(AuthorRole::First.as_str(), "1");
        assert_eq!(AuthorRole::Second.as_str(), "2");
        assert_eq!(AuthorRole::Middle.as_str(), "3");
        assert_eq!(AuthorRole::Last.as_str(), "4");
    }

    #[test]
    fn test_parse_source_text_multiword_journal() {
        let fields =
            parse_source_text("Annals of Internal Medicine . 2019 Dec 3;171(11):805-813 .")
                .expect("parse failed");
        assert_eq!(fields.journal, "Annals of Internal Medicine");
        assert_eq!(fields.date, "2019 Dec 3");
    }

    #[test]
    fn test_parse_source_text_without_separator() {
        let fields = parse_source_text("Lancet 2020").expect("parse failed");
        assert_eq!(fields.journal, "Lancet 2020");
        assert_eq!(fields.date, "");
    }

    #[test]
    fn test_scan_byline_counts_skipped_entries() {
        let names = ["Jane Q Public", "Ada Lovelace", "John Smith", "Grace Hopper"]
            .into_iter()
            .map(String::from);
        let scan = scan_byline(names, "Smith");
        assert_eq!(scan.position, Some(3));
        assert_eq!(scan.total, 4);
        assert_eq!(scan.matched.as_deref(), Some("John Smith"));
    }

    #[test]
    fn test_scan_byline_no_match() {
        let names = ["Jane Q Public"].into_iter().map(String::from);
        let scan = scan_byline(names, "Smith");
        assert_eq!(scan.position, None);
        assert_eq!(scan.matched, None);
        assert_eq!(scan.total, 1);
    }

    #[test]
    fn test_abbreviate() {
        assert_eq!(abbreviate("Jane Q Public"), "Public, J");
        assert_eq!(abbreviate("Ada Lovelace"), "Lovelace, A");
    }
}
