//! Shared application state

use std::sync::Arc;

use anyhow::{Context, Result};
use spindj_lastfm_client::LastfmClient;
use spindj_recommender::PlaylistAssembler;
use spindj_spotify_client::{SpotifyAuth, SpotifyClient};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::services::{HealthService, PlaylistService};

/// Handles shared by every route
///
/// Built once at startup; cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub lastfm: Arc<LastfmClient>,
    pub spotify: Arc<SpotifyClient>,
    pub spotify_auth: Arc<SpotifyAuth>,
    pub playlists: PlaylistService,
    pub health: HealthService,
    /// State parameter of the login in progress, if any
    pub pending_login: Arc<Mutex<Option<String>>>,
}

impl AppState {
    /// Build the service clients from configuration
    pub fn from_config(config: Config) -> Result<Self> {
        let lastfm = Arc::new(
            LastfmClient::from_config(config.lastfm()).context("Failed to create Last.fm client")?,
        );
        let spotify = Arc::new(
            SpotifyClient::new(config.spotify()).context("Failed to create Spotify client")?,
        );
        let spotify_auth = Arc::new(
            SpotifyAuth::new(config.spotify()).context("Failed to create Spotify auth client")?,
        );

        let assembler = PlaylistAssembler::new(
            lastfm.clone(),
            spotify.clone(),
            spotify_auth.clone(),
            config.pipeline().clone(),
        );
        let playlists = PlaylistService::new(assembler, spotify.clone(), spotify_auth.clone());

        Ok(Self {
            config: Arc::new(config),
            lastfm,
            spotify,
            spotify_auth,
            playlists,
            health: HealthService::new(),
            pending_login: Arc::new(Mutex::new(None)),
        })
    }
}
