use async_trait::async_trait;

/// Retrieves page text and raw media bytes over HTTP. The trait is the
/// seam between the scraping/derivation logic and the network.
#[async_trait]
pub trait PageFetcher {
    async fn fetch_text(&self, url: &str) -> anyhow::Result<String>;
    async fn fetch_bytes(&self, url: &str) -> anyhow::Result<Vec<u8>>;
}

pub struct HttpFetcher;

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> anyhow::Result<String> {
        let resp = reqwest::get(url).await?.error_for_status()?;
        Ok(resp.text().await?)
    }

    async fn fetch_bytes(&self, url: &str) -> anyhow::Result<Vec<u8>> {
        let resp = reqwest::get(url).await?.error_for_status()?;
        Ok(resp.bytes().await?.to_vec())
    }
}
