//! Track fixtures shared by the Last.fm and Spotify mocks

use serde_json::{json, Value};

/// A track as both services know it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackFixture {
    pub name: String,
    pub artist: String,
}

impl TrackFixture {
    pub fn new(name: &str, artist: &str) -> Self {
        Self {
            name: name.to_string(),
            artist: artist.to_string(),
        }
    }

    /// Deterministic Spotify ID derived from artist and title
    pub fn spotify_id(&self) -> String {
        format!("{}-{}", self.artist, self.name)
            .to_lowercase()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect()
    }

    /// Spotify search query the resolver issues for this track
    pub fn search_query(&self) -> String {
        format!("track:{} artist:{}", self.name, self.artist)
    }

    /// Item of a Last.fm `track.getsimilar` response
    pub fn to_lastfm_similar_json(&self, match_score: f64) -> Value {
        json!({
            "name": self.name,
            "playcount": 123456,
            "match": match_score,
            "url": format!(
                "https://www.last.fm/music/{}/_/{}",
                self.artist.replace(' ', "+"),
                self.name.replace(' ', "+")
            ),
            "artist": {
                "name": self.artist,
                "url": format!("https://www.last.fm/music/{}", self.artist.replace(' ', "+"))
            }
        })
    }

    /// Item of a Last.fm `tag.gettoptracks` response
    pub fn to_lastfm_tag_json(&self, rank: usize) -> Value {
        json!({
            "name": self.name,
            "duration": "240",
            "url": format!("https://www.last.fm/music/{}/_/{}", self.artist, self.name),
            "artist": {"name": self.artist},
            "@attr": {"rank": rank.to_string()}
        })
    }

    /// Spotify track object
    pub fn to_spotify_json(&self) -> Value {
        let id = self.spotify_id();
        json!({
            "id": id,
            "name": self.name,
            "artists": [{"id": format!("artist_{}", id), "name": self.artist}],
            "album": {"id": format!("album_{}", id), "name": format!("{} (Album)", self.name)},
            "external_urls": {"spotify": format!("https://open.spotify.com/track/{}", id)},
            "preview_url": null
        })
    }
}

/// `count` distinct tracks for a tag, named after the tag
pub fn tag_tracks(tag: &str, count: usize) -> Vec<TrackFixture> {
    (1..=count)
        .map(|i| TrackFixture::new(&format!("{} Track {}", tag, i), &format!("{} Artist {}", tag, i)))
        .collect()
}
