use anyhow::Context;

use crate::config::{Config, Resolution};
use crate::download::{DownloadOutcome, Downloader};
use crate::errors::WwdcError;
use crate::fetch::PageFetcher;
use crate::patterns::{self, SessionAssets};

/// One conference talk, with the asset URLs derived from its play page.
pub struct Session {
    year: String,
    id: String,
    assets: SessionAssets,
}

impl Session {
    /// Fetch the session's play page and derive its asset URLs.
    pub async fn try_new(
        fetcher: &impl PageFetcher,
        year: &str,
        id: &str,
    ) -> anyhow::Result<Session> {
        let play_page_url = format!("https://developer.apple.com/videos/play/wwdc{year}/{id}/");
        log::info!("The play page URL: {}", play_page_url);
        let html = fetcher
            .fetch_text(&play_page_url)
            .await
            .with_context(|| format!("Cannot read the HTML page {play_page_url}"))?;
        let assets = patterns::derive_urls(year, id, &html)?;
        Ok(Session {
            year: year.to_owned(),
            id: id.to_owned(),
            assets,
        })
    }

    /// Download the requested assets: the slide PDF unless disabled, then
    /// the direct video in the requested resolution, with HLS as the
    /// fallback delivery. A missing PDF never stops the video.
    pub async fn download(
        &self,
        fetcher: &impl PageFetcher,
        downloader: &Downloader,
        config: &Config,
    ) -> anyhow::Result<()> {
        if config.wants_pdf {
            self.download_pdf(fetcher, downloader).await;
        }
        if config.pdf_only {
            return Ok(());
        }
        self.download_video(fetcher, downloader, config.resolution)
            .await
    }

    async fn download_pdf(&self, fetcher: &impl PageFetcher, downloader: &Downloader) {
        match &self.assets.pdf {
            Some(url) => match downloader.download(fetcher, url, &self.year).await {
                Ok(DownloadOutcome::Downloaded(path)) => {
                    log::info!("PDF downloaded to {}", path.display());
                }
                Ok(DownloadOutcome::AlreadyExists(path)) => {
                    log::info!("PDF already exists at {}", path.display());
                }
                Err(error) => log::warn!("Failed to download the PDF: {:#}", error),
            },
            None => log::warn!("Cannot find the PDF for session {}", self.id),
        }
    }

    async fn download_video(
        &self,
        fetcher: &impl PageFetcher,
        downloader: &Downloader,
        resolution: Resolution,
    ) -> anyhow::Result<()> {
        let direct_url = match resolution {
            Resolution::Hd => self.assets.video_hd.as_deref(),
            Resolution::Sd => self.assets.video_sd.as_deref(),
        };

        if let Some(url) = direct_url {
            match downloader.download(fetcher, url, &self.year).await? {
                DownloadOutcome::Downloaded(path) => {
                    log::info!("Video downloaded to {}", path.display());
                }
                DownloadOutcome::AlreadyExists(path) => {
                    log::info!("Video already exists at {}", path.display());
                }
            }
            return Ok(());
        }

        log::warn!(
            "Cannot find the {} video for session {}",
            resolution,
            self.id
        );
        match &self.assets.hls {
            Some(manifest_url) => {
                if let DownloadOutcome::AlreadyExists(path) = downloader
                    .download_hls(manifest_url, &self.year, &self.id)
                    .await?
                {
                    log::info!("Video already exists at {}", path.display());
                }
                Ok(())
            }
            None => {
                Err(WwdcError::NotFound(format!("a video URL for session {}", self.id)).into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::Mutex;

    // Serves one canned play page and records every fetch it sees.
    struct ScriptedFetcher {
        html: &'static str,
        fetched: Mutex<Vec<String>>,
    }

    impl ScriptedFetcher {
        fn new(html: &'static str) -> Self {
            ScriptedFetcher {
                html,
                fetched: Mutex::new(Vec::new()),
            }
        }

        fn fetched(&self) -> Vec<String> {
            self.fetched.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageFetcher for ScriptedFetcher {
        async fn fetch_text(&self, url: &str) -> anyhow::Result<String> {
            self.fetched.lock().unwrap().push(format!("text {url}"));
            Ok(self.html.to_owned())
        }

        async fn fetch_bytes(&self, url: &str) -> anyhow::Result<Vec<u8>> {
            self.fetched.lock().unwrap().push(format!("bytes {url}"));
            Ok(b"payload".to_vec())
        }
    }

    fn config(resolution: Resolution, wants_pdf: bool, pdf_only: bool, dir: &Path) -> Config {
        Config {
            year: "2016".to_owned(),
            resolution,
            wants_pdf,
            pdf_only,
            output_dir: Some(dir.to_path_buf()),
        }
    }

    const SD_ONLY_PAGE: &str = r#"
        <video src="http://devstreaming.apple.com/videos/wwdc/2016/104xyz/104/104_sd_foo.mp4"></video>
    "#;

    const FULL_PAGE: &str = r#"
        <video src="http://devstreaming.apple.com/videos/wwdc/2016/104xyz/104/104_hd_foo.mp4"></video>
        <video src="http://devstreaming.apple.com/videos/wwdc/2016/104xyz/104/104_sd_foo.mp4"></video>
        <a href="http://devstreaming.apple.com/videos/wwdc/2016/104xyz/104/104_foo.pdf">Slides</a>
    "#;

    #[tokio::test]
    async fn sd_video_without_pdf_downloads_exactly_one_url() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = ScriptedFetcher::new(SD_ONLY_PAGE);
        let downloader = Downloader::new(Some(dir.path().to_path_buf()));
        let config = config(Resolution::Sd, false, false, dir.path());

        let session = Session::try_new(&fetcher, "2016", "104").await.unwrap();
        session.download(&fetcher, &downloader, &config).await.unwrap();

        // One page fetch, one media fetch, nothing else: no PDF and no
        // HLS attempt.
        assert_eq!(
            fetcher.fetched(),
            vec![
                "text https://developer.apple.com/videos/play/wwdc2016/104/".to_owned(),
                "bytes http://devstreaming.apple.com/videos/wwdc/2016/104xyz/104/104_sd_foo.mp4"
                    .to_owned(),
            ]
        );
        let dest = dir.path().join("WWDC-2016").join("104_sd_foo.mp4");
        assert_eq!(std::fs::read(&dest).unwrap(), b"payload");
    }

    #[tokio::test]
    async fn missing_pdf_does_not_stop_the_video() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = ScriptedFetcher::new(SD_ONLY_PAGE);
        let downloader = Downloader::new(Some(dir.path().to_path_buf()));
        let config = config(Resolution::Sd, true, false, dir.path());

        let session = Session::try_new(&fetcher, "2016", "104").await.unwrap();
        session.download(&fetcher, &downloader, &config).await.unwrap();

        assert!(dir
            .path()
            .join("WWDC-2016")
            .join("104_sd_foo.mp4")
            .exists());
    }

    #[tokio::test]
    async fn hd_flag_selects_the_hd_variant() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = ScriptedFetcher::new(FULL_PAGE);
        let downloader = Downloader::new(Some(dir.path().to_path_buf()));
        let config = config(Resolution::Hd, false, false, dir.path());

        let session = Session::try_new(&fetcher, "2016", "104").await.unwrap();
        session.download(&fetcher, &downloader, &config).await.unwrap();

        assert!(dir
            .path()
            .join("WWDC-2016")
            .join("104_hd_foo.mp4")
            .exists());
        assert!(!dir
            .path()
            .join("WWDC-2016")
            .join("104_sd_foo.mp4")
            .exists());
    }

    #[tokio::test]
    async fn pdf_only_skips_the_video_entirely() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = ScriptedFetcher::new(FULL_PAGE);
        let downloader = Downloader::new(Some(dir.path().to_path_buf()));
        let config = config(Resolution::Sd, true, true, dir.path());

        let session = Session::try_new(&fetcher, "2016", "104").await.unwrap();
        session.download(&fetcher, &downloader, &config).await.unwrap();

        assert!(dir.path().join("WWDC-2016").join("104_foo.pdf").exists());
        assert!(!dir
            .path()
            .join("WWDC-2016")
            .join("104_sd_foo.mp4")
            .exists());
    }

    #[tokio::test]
    async fn no_video_and_no_hls_is_a_contained_failure() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = ScriptedFetcher::new("<html><body>no media here</body></html>");
        let downloader = Downloader::new(Some(dir.path().to_path_buf()));
        let config = config(Resolution::Sd, false, false, dir.path());

        let session = Session::try_new(&fetcher, "2016", "104").await.unwrap();
        let result = session.download(&fetcher, &downloader, &config).await;

        assert!(result.is_err());
        // Only the play page was ever fetched.
        assert_eq!(
            fetcher.fetched(),
            vec!["text https://developer.apple.com/videos/play/wwdc2016/104/".to_owned()]
        );
    }
}
