//! Turns release-style names into search queries.

use regex::Regex;
use tracing::debug;

/// Extracts a searchable title from a release-style file or directory name.
pub trait TitleParser {
    fn clean_title(&self, name: &str) -> String;
}

/// Default parser for scene-style names such as
/// `The.Matrix.1999.1080p.BluRay.x264-GROUP`.
#[derive(Debug)]
pub struct ReleaseNameParser {
    leading_tag: Regex,
    release_marker: Regex,
}

impl ReleaseNameParser {
    pub fn new() -> Self {
        let leading_tag = Regex::new(r"^\s*[\[(][^\])]*[\])]\s*").expect("valid tag pattern");
        let release_marker = Regex::new(
            r"(?xi)\b(?:
                (?:19|20)\d{2}
              | \d{3,4}p | 4k | uhd
              | blu-?ray | brrip | bdrip | dvdrip | dvdscr
              | webrip | web-?dl | hdtv | hdrip | camrip
              | telesync | screener | r5
              | x26[45] | h26[45] | hevc | xvid | divx
              | unrated | extended | remastered | director'?s\ cut | dc
              | proper | repack | limited | internal
              | aac | ac3 | dts | 5\ 1
            )\b",
        )
        .expect("valid release marker pattern");

        Self {
            leading_tag,
            release_marker,
        }
    }

    fn normalize(text: &str) -> String {
        text.replace(['.', '_'], " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for ReleaseNameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TitleParser for ReleaseNameParser {
    fn clean_title(&self, name: &str) -> String {
        debug!("Determining clean name for \"{}\"", name);

        let stripped = self.leading_tag.replace(name, "");
        let spaced = Self::normalize(&stripped);

        // A marker at the very start is part of the title ("2001 A Space Odyssey").
        let mut cut = spaced.len();
        if let Some(m) = self.release_marker.find_iter(&spaced).find(|m| m.start() > 0) {
            cut = m.start();
        }
        if let Some(pos) = spaced.find(['(', '[']).filter(|&p| p > 0) {
            cut = cut.min(pos);
        }

        let title = spaced[..cut]
            .trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '(' | '[' | ','))
            .to_string();
        let title = if title.is_empty() { spaced } else { title };

        debug!("Clean name is \"{}\"", title);
        title
    }
}
