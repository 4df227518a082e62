use once_cell::sync::Lazy;
use regex::Regex;

/// Thumbnail variants published for every video, best first
pub const THUMBNAIL_QUALITIES: [&str; 5] = [
    "maxresdefault",
    "sddefault",
    "hqdefault",
    "mqdefault",
    "default",
];

// The id must end the URL or be followed by a non-id character.
static YOUTUBE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        ^(?:https?://)?
        (?:
            (?:www\.|m\.|music\.)?youtube\.com/
            (?:
                watch/?\?(?:[^\#]*&)?v=
              | (?:embed|v|live|shorts)/
            )
          | youtu\.be/
          | (?:www\.)?youtube-nocookie\.com/embed/
        )
        ([A-Za-z0-9_-]{11})
        (?:[^A-Za-z0-9_-]|$)",
    )
    .expect("Failed to compile YouTube regex")
});

/// Pull the 11 character video id out of a YouTube URL
pub fn extract_video_id(url: &str) -> Option<String> {
    YOUTUBE_REGEX
        .captures(url.trim())
        .and_then(|caps| caps.get(1).map(|m| m.as_str().to_owned()))
}

/// Candidate thumbnail URLs for `video_id`, highest quality first
pub fn candidate_thumbnail_urls(base_url: &str, video_id: &str) -> Vec<String> {
    let base = base_url.trim_end_matches('/');
    THUMBNAIL_QUALITIES
        .iter()
        .map(|quality| format!("{}/{}/{}.jpg", base, video_id, quality))
        .collect()
}

/// Canonical watch URL, used for the oEmbed lookup
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}
