//! Sequential batch driver.
//!
//! Reads one `Last, First` author per input line, runs the
//! search → extract → metrics pipeline for each, and appends the rendered
//! records to the output file, one blank line between author blocks.
//! Failures stay scoped: a bad article is skipped, a bad author contributes
//! an empty block, and the batch always runs to the end of the input.

use crate::error::Result;
use crate::fetch::Fetcher;
use crate::pubmed::{self, AuthorName, SearchOptions};
use crate::researcher::{PublicationRecord, Researcher};
use crate::scimago;
use rand::Rng;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, warn};

/// Courtesy delay bounds in seconds, drawn uniformly before each search
const DELAY_RANGE: std::ops::Range<f64> = 1.0..2.3;

/// Batch run configuration
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Author list, one `Last, First` name per line
    pub input: PathBuf,
    /// Output file, truncated at the start of the run
    pub output: PathBuf,
    /// Publication search parameters
    pub search: SearchOptions,
}

/// Process every author in the input file and write the output file.
///
/// # Errors
///
/// Returns an error only for run-level failures (unreadable input,
/// unwritable output, bad configuration); per-author and per-article
/// failures are logged and skipped.
pub async fn run(options: &BatchOptions) -> Result<()> {
    let fetcher = Fetcher::new()?;
    let input = File::open(&options.input)?;
    let mut output = BufWriter::new(File::create(&options.output)?);

    for line in BufReader::new(input).lines() {
        let line = line?;

        let researcher = match process_author(&fetcher, &line, &options.search).await {
            Ok(researcher) => researcher,
            Err(e) => {
                error!(author = line.as_str(), error = %e, "skipping author");
                Researcher::new()
            }
        };

        info!(
            author = line.as_str(),
            count = researcher.len(),
            "publications found"
        );

        write_block(&mut output, &researcher)?;
        output.flush()?;
    }

    Ok(())
}

/// Run the pipeline for one author line.
async fn process_author(
    fetcher: &Fetcher,
    line: &str,
    search: &SearchOptions,
) -> Result<Researcher> {
    let author = AuthorName::parse(line)?;
    info!(author = line, "finding publications");

    let search_url = pubmed::search_url(&author, search)?;
    info!(url = %search_url, "search query");

    courtesy_delay().await;

    let html = fetcher.get(&search_url).await?;
    let links = pubmed::parse_search_results(&html)?;

    let mut researcher = Researcher::new();
    for href in links {
        let article_url = match pubmed::article_url(&href) {
            Ok(url) => url,
            Err(e) => {
                warn!(href = href.as_str(), error = %e, "skipping article");
                continue;
            }
        };

        let html = match fetcher.get(&article_url).await {
            Ok(html) => html,
            Err(e) => {
                warn!(url = %article_url, error = %e, "skipping article");
                continue;
            }
        };

        let article = match pubmed::parse_article(&html, &author) {
            Ok(article) => article,
            Err(e) => {
                warn!(url = %article_url, error = %e, "unexpected article layout, skipping");
                continue;
            }
        };

        let year: String = article.date.chars().take(4).collect();
        let metrics = scimago::lookup(fetcher, &article.journal, &year).await;

        researcher.add_publication(&PublicationRecord::new(article, metrics));
    }

    Ok(researcher)
}

/// Pause between authors so the source site is not hammered.
async fn courtesy_delay() {
    let seconds = rand::thread_rng().gen_range(DELAY_RANGE);
    tokio::time::sleep(Duration::from_secs_f64(seconds)).await;
}

/// Write one author's records followed by the blank separator line.
fn write_block<W: Write>(writer: &mut W, researcher: &Researcher) -> std::io::Result<()> {
    for record in researcher.publications() {
        writeln!(writer, "{record}")?;
    }
    writeln!(writer)
}
