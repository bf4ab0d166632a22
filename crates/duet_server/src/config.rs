//! Node configuration: defaults, TOML file, then CLI/env overrides.

use crate::cli::{ConfigOverrides, parse_player};
use crate::error::ConfigError;
use derive_getters::Getters;
use derive_setters::Setters;
use duet_tictactoe::Player;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Port whose node moves for X when no explicit assignment is given.
pub const X_PORT: u16 = 8082;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_ADDRESS: &str = "127.0.0.1";
const DEFAULT_PEER_PORT: u16 = 8082;
const DEFAULT_PEER_HOST: &str = "localhost";
const DEFAULT_SYNC_INTERVAL_MS: u64 = 5000;

/// Path shared by pull (GET) and push (POST) on the peer.
pub const STATE_PATH: &str = "/api/game/state";

/// Resolved settings for one node.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters)]
#[setters(prefix = "with_")]
pub struct NodeConfig {
    /// Address the HTTP listener binds to.
    server_address: String,
    /// Port the HTTP listener binds to.
    server_port: u16,
    /// Host of the peer node.
    other_instance_host: String,
    /// Port of the peer node.
    other_instance_port: u16,
    /// Time between sync ticks; also the peer request timeout.
    sync_interval: Duration,
    /// Run a sync tick right after each local move or reset.
    sync_on_mutation: bool,
    /// Explicit player assignment, overriding the port rule.
    #[setters(strip_option)]
    player_assignment: Option<Player>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            server_address: DEFAULT_ADDRESS.to_string(),
            server_port: DEFAULT_PORT,
            other_instance_host: DEFAULT_PEER_HOST.to_string(),
            other_instance_port: DEFAULT_PEER_PORT,
            sync_interval: Duration::from_millis(DEFAULT_SYNC_INTERVAL_MS),
            sync_on_mutation: true,
            player_assignment: None,
        }
    }
}

impl NodeConfig {
    /// Player this node moves for: the explicit assignment, else X on port 8082 and O elsewhere.
    pub fn assigned_player(&self) -> Player {
        match self.player_assignment {
            Some(player) => player,
            None if self.server_port == X_PORT => Player::X,
            None => Player::O,
        }
    }

    /// URL of the peer's state endpoint.
    pub fn peer_state_url(&self) -> String {
        format!(
            "http://{}:{}{}",
            self.other_instance_host, self.other_instance_port, STATE_PATH
        )
    }

    /// Socket address string for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_address, self.server_port)
    }

    /// Loads the layered configuration: defaults, then the TOML file, then overrides.
    #[instrument(skip(overrides))]
    pub fn load(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => {
                debug!("Loading config from file");
                let content = std::fs::read_to_string(path).map_err(|e| {
                    ConfigError::new(format!(
                        "Failed to read config file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                Self::from_toml_str(&content)?
            }
            None => Self::default(),
        };

        let config = base.apply_overrides(overrides);
        config.validate()?;
        info!(
            port = config.server_port,
            peer = %config.peer_state_url(),
            player = %config.assigned_player(),
            interval_ms = config.sync_interval.as_millis() as u64,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Parses a TOML document over the defaults. Missing keys keep their default.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        let defaults = Self::default();

        let player_assignment = match file.player.assignment {
            Some(raw) => Some(parse_player(&raw).map_err(ConfigError::new)?),
            None => None,
        };

        Ok(Self {
            server_address: file.server.address.unwrap_or(defaults.server_address),
            server_port: file.server.port.unwrap_or(defaults.server_port),
            other_instance_host: file
                .other
                .instance
                .host
                .unwrap_or(defaults.other_instance_host),
            other_instance_port: file
                .other
                .instance
                .port
                .unwrap_or(defaults.other_instance_port),
            sync_interval: file
                .sync
                .interval
                .milliseconds
                .map(Duration::from_millis)
                .unwrap_or(defaults.sync_interval),
            sync_on_mutation: file.sync.on.mutation.unwrap_or(defaults.sync_on_mutation),
            player_assignment,
        })
    }

    /// Layers CLI/env values over this configuration.
    pub fn apply_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(port) = overrides.port {
            self.server_port = port;
        }
        if let Some(host) = &overrides.host {
            self.server_address = host.clone();
        }
        if let Some(port) = overrides.peer_port {
            self.other_instance_port = port;
        }
        if let Some(host) = &overrides.peer_host {
            self.other_instance_host = host.clone();
        }
        if let Some(ms) = overrides.sync_interval_ms {
            self.sync_interval = Duration::from_millis(ms);
        }
        if let Some(player) = overrides.player {
            self.player_assignment = Some(player);
        }
        if overrides.no_sync_on_mutation {
            self.sync_on_mutation = false;
        }
        self
    }

    /// Rejects a zero sync interval and a peer address equal to our own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sync_interval.is_zero() {
            return Err(ConfigError::new(
                "sync.interval.milliseconds must be greater than zero",
            ));
        }
        if self.server_port == self.other_instance_port
            && same_host(&self.server_address, &self.other_instance_host)
        {
            return Err(ConfigError::new(format!(
                "other.instance points at this node ({}:{})",
                self.other_instance_host, self.other_instance_port
            )));
        }
        Ok(())
    }
}

fn same_host(a: &str, b: &str) -> bool {
    fn loopback(host: &str) -> &str {
        match host {
            "localhost" | "0.0.0.0" | "::1" => "127.0.0.1",
            other => other,
        }
    }
    loopback(a).eq_ignore_ascii_case(loopback(b))
}

// TOML layout, mirroring the dotted property names.

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    server: ServerSection,
    other: OtherSection,
    sync: SyncSection,
    player: PlayerSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ServerSection {
    port: Option<u16>,
    address: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct OtherSection {
    instance: InstanceSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct InstanceSection {
    port: Option<u16>,
    host: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SyncSection {
    interval: IntervalSection,
    on: OnSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct IntervalSection {
    milliseconds: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct OnSection {
    mutation: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PlayerSection {
    assignment: Option<String>,
}
