use std::collections::BTreeSet;

use crate::errors::WwdcError;
use crate::fetch::PageFetcher;

/// All distinct session ids linked from the year's listing page, in
/// ascending order of the id text.
pub async fn list_sessions(fetcher: &impl PageFetcher, year: &str) -> anyhow::Result<Vec<String>> {
    let listing_url = format!("https://developer.apple.com/videos/wwdc{year}/");
    log::info!("Fetching the session listing: {}", listing_url);
    let html = fetcher.fetch_text(&listing_url).await?;
    let ids = session_ids_in(year, &html)?;
    if ids.is_empty() {
        return Err(WwdcError::EmptyListing(year.to_owned()).into());
    }
    Ok(ids)
}

fn session_ids_in(year: &str, html: &str) -> anyhow::Result<Vec<String>> {
    let document = scraper::Html::parse_document(html);
    let selector = scraper::Selector::parse("a").map_err(|_| WwdcError::ParseFailed)?;
    let re = regex::Regex::new(&format!("/videos/play/wwdc{year}/([0-9]+)/"))?;

    // A session can be linked more than once on the listing page.
    let mut ids = BTreeSet::new();
    for anchor in document.select(&selector) {
        if let Some(href) = anchor.value().attr("href") {
            if let Some(captures) = re.captures(href) {
                ids.insert(captures[1].to_owned());
            }
        }
    }
    Ok(ids.into_iter().collect())
}
