use game_bridge::BridgeConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

// =============================================================================
// Unified config (figment-deserialized from defaults / gameplay.toml / env vars)
// =============================================================================
//
// Three equivalent ways to configure:
//
//   gameplay.toml:   [server]
//                    port = 8080
//
//   env var:         GAMEPLAY_SERVER__PORT=8080   (double underscore = nesting)
//
//   (single underscore stays within field names: GAMEPLAY_BRIDGE__LOAD_DELAY_MS)

pub const CONFIG_FILE_NAME: &str = "gameplay.toml";

/// Top-level configuration, deserialized by figment.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerFileConfig,
    #[serde(default)]
    pub bridge: BridgeConfig,
    #[serde(default)]
    pub limits: LimitsFileConfig,
    #[serde(default)]
    pub games: Vec<GameEntry>,
}

/// Listener and asset settings (lives under `[server]` in gameplay.toml).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerFileConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding the wasm-pack output of game_bridge_web, served at /pkg
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,
}

impl Default for ServerFileConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            assets_dir: default_assets_dir(),
        }
    }
}

impl ServerFileConfig {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

/// Limits on what the forms accept (lives under `[limits]`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LimitsFileConfig {
    #[serde(default = "default_max_state_len")]
    pub max_state_len: usize,
}

impl Default for LimitsFileConfig {
    fn default() -> Self {
        Self {
            max_state_len: default_max_state_len(),
        }
    }
}

/// A game that can be played (one `[[games]]` table each).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameEntry {
    pub id: u64,
    pub name: String,
    /// Address the game iframe loads
    pub url: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_assets_dir() -> PathBuf {
    PathBuf::from("packages/game_bridge_web/pkg")
}
fn default_max_state_len() -> usize {
    10000
}

/// Build a figment that layers: defaults → gameplay.toml → GAMEPLAY_* env vars.
///
/// Env vars use double-underscore for nesting into sections:
///   `GAMEPLAY_SERVER__PORT=8080`  →  `server.port = 8080`
///   `GAMEPLAY_BRIDGE__READINESS=delay`  →  `bridge.readiness = "delay"`
pub fn load_config(config_dir: &Path) -> figment::Figment {
    use figment::{
        Figment,
        providers::{Env, Format, Serialized, Toml},
    };

    Figment::from(Serialized::defaults(FileConfig::default()))
        .merge(Toml::file(config_dir.join(CONFIG_FILE_NAME)))
        .merge(Env::prefixed("GAMEPLAY_").split("__"))
}
