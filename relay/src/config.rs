//! Process configuration.
//!
//! Every option can be given as a flag or through the environment variable
//! TeslaMate deployments already use (`MQTT_HOST`, `API_KEY`, ...).

use carstate_ingest::{AccessMode, DEFAULT_TOPIC_PREFIX, PipelineConfig, UnitConfig};
use carstate_types::{DistanceUnit, TemperatureUnit};
use clap::Parser;
use rand::RngCore;
use tracing::info;

#[derive(Parser, Debug, Clone)]
#[command(name = "carstate-relay")]
#[command(about = "Serves TeslaMate MQTT telemetry as per-car JSON snapshots")]
pub struct Args {
    /// MQTT broker host
    #[arg(long, env = "MQTT_HOST")]
    pub mqtt_host: String,

    /// MQTT broker port
    #[arg(long, env = "MQTT_PORT", default_value_t = 1883)]
    pub mqtt_port: u16,

    /// API key required on every request; also unlocks location fields
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Distance unit: "km" or "imperial"
    #[arg(long, env = "DISTANCE_UNIT")]
    pub distance_unit: Option<String>,

    /// Temperature unit: "C" or "F"
    #[arg(long, env = "TEMPERATURE_UNIT")]
    pub temperature_unit: Option<String>,

    /// Topic prefix to subscribe under
    #[arg(long, env = "TOPIC_PREFIX", default_value = DEFAULT_TOPIC_PREFIX)]
    pub topic_prefix: String,

    /// HTTP API port
    #[arg(long, env = "HTTP_PORT", default_value_t = 3000)]
    pub http_port: u16,

    /// Enable verbose debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Where and as whom to connect to the broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerConfig {
    pub host: String,
    pub port: u16,
    pub client_id: String,
}

/// Resolved configuration, passed explicitly to the components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub broker: BrokerConfig,
    pub api_key: Option<String>,
    pub units: UnitConfig,
    pub topic_prefix: String,
    pub http_port: u16,
}

impl RelayConfig {
    /// Resolves parsed arguments, falling back to defaults for unknown units.
    pub fn from_args(args: Args) -> Self {
        Self {
            broker: BrokerConfig {
                host: args.mqtt_host,
                port: args.mqtt_port,
                client_id: generate_client_id(),
            },
            api_key: args.api_key.filter(|key| !key.is_empty()),
            units: UnitConfig {
                distance: resolve_distance_unit(args.distance_unit.as_deref()),
                temperature: resolve_temperature_unit(args.temperature_unit.as_deref()),
            },
            topic_prefix: args.topic_prefix,
            http_port: args.http_port,
        }
    }

    pub fn access_mode(&self) -> AccessMode {
        AccessMode::from_api_key(self.api_key.as_deref())
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            topic_prefix: self.topic_prefix.clone(),
            access: self.access_mode(),
            units: self.units,
        }
    }
}

/// Parses a distance unit, defaulting to km when missing or invalid.
pub fn resolve_distance_unit(raw: Option<&str>) -> DistanceUnit {
    match raw.map(str::parse::<DistanceUnit>) {
        Some(Ok(unit)) => unit,
        _ => {
            info!(
                "No DISTANCE_UNIT defined, using '{}' (alternative is '{}')",
                DistanceUnit::Km,
                DistanceUnit::Imperial
            );
            DistanceUnit::Km
        }
    }
}

/// Parses a temperature unit, defaulting to Celsius when missing or invalid.
pub fn resolve_temperature_unit(raw: Option<&str>) -> TemperatureUnit {
    match raw.map(str::parse::<TemperatureUnit>) {
        Some(Ok(unit)) => unit,
        _ => {
            info!(
                "No TEMPERATURE_UNIT defined, using '{}' (alternative is '{}')",
                TemperatureUnit::Celsius,
                TemperatureUnit::Fahrenheit
            );
            TemperatureUnit::Celsius
        }
    }
}

/// `teslamate-mqtt-api-` followed by six random hex digits.
pub fn generate_client_id() -> String {
    let mut suffix = [0u8; 3];
    rand::thread_rng().fill_bytes(&mut suffix);
    format!("teslamate-mqtt-api-{}", hex::encode(suffix))
}
