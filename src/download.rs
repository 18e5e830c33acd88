use std::io::Write;
use std::path::{Path, PathBuf};

use crate::errors::WwdcError;
use crate::fetch::PageFetcher;

/// External stream downloader used when a session is published as HLS
/// only. Contract: given a manifest URL and `-o <dest>`, it either
/// produces a playable file at `dest` or fails.
const HLS_DOWNLOADER: &str = "youtube-dl";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Downloaded(PathBuf),
    AlreadyExists(PathBuf),
}

pub struct Downloader {
    base_dir: Option<PathBuf>,
}

impl Downloader {
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Downloader { base_dir }
    }

    fn base_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.base_dir {
            Some(dir) => Ok(dir.clone()),
            None => {
                let dirs = directories::UserDirs::new().ok_or(WwdcError::NoDocumentsDir)?;
                let documents = dirs.document_dir().ok_or(WwdcError::NoDocumentsDir)?;
                Ok(documents.to_path_buf())
            }
        }
    }

    /// The per-year output directory, created on first use.
    fn year_dir(&self, year: &str) -> anyhow::Result<PathBuf> {
        let dir = self.base_dir()?.join(format!("WWDC-{year}"));
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Fetch a direct URL into the year directory, named after the URL's
    /// final path segment. An existing destination is left untouched and
    /// reported as `AlreadyExists` without any network I/O.
    pub async fn download(
        &self,
        fetcher: &impl PageFetcher,
        url: &str,
        year: &str,
    ) -> anyhow::Result<DownloadOutcome> {
        let dest = self.year_dir(year)?.join(file_name_of(url)?);
        if dest.exists() {
            return Ok(DownloadOutcome::AlreadyExists(dest));
        }

        let bytes = fetcher.fetch_bytes(url).await?;

        // Stage into a sibling temp file so an interrupted write never
        // leaves a partial file at the final path.
        let temp = temp_path(&dest);
        if let Err(error) = write_all_to(&temp, &bytes) {
            let _ = std::fs::remove_file(&temp);
            return Err(error);
        }
        std::fs::rename(&temp, &dest)?;
        Ok(DownloadOutcome::Downloaded(dest))
    }

    /// Hand an HLS-only session to the external stream downloader and
    /// forward its output. A non-zero exit is logged, not propagated.
    pub async fn download_hls(
        &self,
        manifest_url: &str,
        year: &str,
        session_id: &str,
    ) -> anyhow::Result<DownloadOutcome> {
        let dest = self.year_dir(year)?.join(format!("{session_id}.mp4"));
        if dest.exists() {
            return Ok(DownloadOutcome::AlreadyExists(dest));
        }

        log::info!("{} {} -o {}", HLS_DOWNLOADER, manifest_url, dest.display());
        let output = tokio::process::Command::new(HLS_DOWNLOADER)
            .arg(manifest_url)
            .arg("-o")
            .arg(&dest)
            .output()
            .await?;
        print!("{}", String::from_utf8_lossy(&output.stdout));
        if !output.status.success() {
            log::warn!(
                "{} exited with {}: {}",
                HLS_DOWNLOADER,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(DownloadOutcome::Downloaded(dest))
    }
}

fn file_name_of(url: &str) -> anyhow::Result<String> {
    let parsed = url::Url::parse(url).map_err(|_| WwdcError::BadUrl(url.to_owned()))?;
    let segment = parsed
        .path()
        .split('/')
        .filter(|s| !s.is_empty())
        .next_back()
        .ok_or_else(|| WwdcError::BadUrl(url.to_owned()))?;
    Ok(segment.to_owned())
}

fn temp_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

fn write_all_to(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(bytes)?;
    Ok(())
}
