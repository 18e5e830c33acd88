use std::fmt;
use std::path::PathBuf;

/// Resolution of the direct video download, selected with `-f`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[value(rename_all = "UPPER")]
pub enum Resolution {
    Sd,
    Hd,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Sd => write!(f, "SD"),
            Resolution::Hd => write!(f, "HD"),
        }
    }
}

/// Run configuration, built once from the command line and passed by
/// reference from there on.
#[derive(Debug, Clone)]
pub struct Config {
    pub year: String,
    pub resolution: Resolution,
    pub wants_pdf: bool,
    pub pdf_only: bool,
    pub output_dir: Option<PathBuf>,
}
