use regex::Regex;

/// Media URLs derived from one play page. One first-occurrence match per
/// category; a category with no match stays `None` and the caller decides
/// the fallback.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionAssets {
    pub video_hd: Option<String>,
    pub video_sd: Option<String>,
    pub pdf: Option<String>,
    pub hls: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Template {
    VideoHd,
    VideoSd,
    Pdf,
    Hls,
}

// The direct-file layout used by the play pages, e.g.
// http://devstreaming.apple.com/videos/wwdc/2016/802z6j79sd7g5drr7k7/802/802_hd_designing_for_tvos.mp4
const VIDEO_HD_TEMPLATE: &str =
    r"http://devstreaming.apple.com/videos/wwdc/{year}/{session}.*/{session}/{session}_hd_.*\.mp4";
const VIDEO_SD_TEMPLATE: &str =
    r"http://devstreaming.apple.com/videos/wwdc/{year}/{session}.*/{session}/{session}_sd_.*\.mp4";
const PDF_TEMPLATE: &str =
    r"http://devstreaming.apple.com/videos/wwdc/{year}/{session}.*/{session}/{session}_.*\.pdf";
const HLS_TEMPLATE: &str =
    r"https://devstreaming-cdn.apple.com/videos/wwdc/{year}/{session}.*/{session}.*\.m3u8";

/// One textual rewrite, applied to the patterns named in `templates`.
struct Rewrite {
    templates: &'static [Template],
    from: &'static str,
    to: &'static str,
}

struct YearRule {
    year: &'static str,
    rewrites: &'static [Rewrite],
}

/// Site layout deviations by year. Adding a year is a data change only.
const YEAR_RULES: &[YearRule] = &[
    YearRule {
        // https and the cdn subdomain
        year: "2017",
        rewrites: &[Rewrite {
            templates: &[Template::VideoHd, Template::VideoSd, Template::Pdf],
            from: "http://devstreaming.apple.com",
            to: "https://devstreaming-cdn.apple.com",
        }],
    },
    YearRule {
        // .mov instead
        year: "2014",
        rewrites: &[Rewrite {
            templates: &[Template::VideoHd, Template::VideoSd],
            from: ".mp4",
            to: ".mov",
        }],
    },
];

fn pattern_for(template: Template, year: &str, session_id: &str) -> String {
    let raw = match template {
        Template::VideoHd => VIDEO_HD_TEMPLATE,
        Template::VideoSd => VIDEO_SD_TEMPLATE,
        Template::Pdf => PDF_TEMPLATE,
        Template::Hls => HLS_TEMPLATE,
    };
    let mut pattern = raw
        .replace("{year}", year)
        .replace("{session}", session_id);
    for rule in YEAR_RULES {
        if rule.year != year {
            continue;
        }
        for rewrite in rule.rewrites {
            if rewrite.templates.contains(&template) {
                pattern = pattern.replace(rewrite.from, rewrite.to);
            }
        }
    }
    pattern
}

// The first occurrence in document order wins, even when the page lists
// several candidate URLs for the same category.
fn first_match(pattern: &str, html: &str) -> anyhow::Result<Option<String>> {
    let re = Regex::new(pattern)?;
    Ok(re.find(html).map(|m| m.as_str().to_owned()))
}

/// Derive the media URLs for one session from its play page HTML.
pub fn derive_urls(year: &str, session_id: &str, html: &str) -> anyhow::Result<SessionAssets> {
    Ok(SessionAssets {
        video_hd: first_match(&pattern_for(Template::VideoHd, year, session_id), html)?,
        video_sd: first_match(&pattern_for(Template::VideoSd, year, session_id), html)?,
        pdf: first_match(&pattern_for(Template::Pdf, year, session_id), html)?,
        hls: first_match(&pattern_for(Template::Hls, year, session_id), html)?,
    })
}
