//! Configuration of the game-server plugin host.
//!
//! The host reads `plugin-config.xml` on start and writes the defaults below
//! when the file does not exist yet.

use std::{collections::BTreeMap, sync::OnceLock};

use serde::Serialize;
use treeconf::{Configuration, Descriptor, Field, Object, config_enum, config_object};

config_enum! {
    /// Logging level filter.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    #[serde(rename_all = "lowercase")]
    pub enum LogLevel {
        Trace => "trace",
        Debug => "debug",
        Info => "info",
        Warn => "warn",
        Error => "error",
    }
}

/// Root configuration document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluginConfig {
    /// Message shown to players when they join.
    pub motd: String,
    /// Server-specific settings.
    pub server: ServerSettings,
    /// Game region boundaries.
    pub region: RegionSettings,
    /// Plugin loading settings.
    pub plugins: PluginSettings,
    /// Permission weight per rank name.
    pub ranks: BTreeMap<String, u32>,
    /// Optional logging configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingSettings>,
}

/// Network and game loop settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerSettings {
    /// Address to bind to, `IP:PORT`.
    pub listen_addr: String,
    pub max_players: usize,
    /// Game loop period in milliseconds.
    pub tick_rate: u64,
    /// Client ping period in milliseconds.
    pub ping_interval: u64,
    /// Connection timeout in milliseconds.
    pub connection_timeout: u64,
    pub event_queue_capacity: usize,
}

/// Boundaries of the game world.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSettings {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub min_z: f64,
    pub max_z: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluginSettings {
    /// Directory searched for plugin libraries.
    pub directory: String,
    /// Plugins loaded on startup, in order.
    pub auto_load: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoggingSettings {
    pub level: LogLevel,
    pub json_format: bool,
}

impl Object for PluginConfig {
    fn empty() -> Self {
        Self {
            motd: "Welcome to the server!".to_string(),
            server: ServerSettings::empty(),
            region: RegionSettings::empty(),
            plugins: PluginSettings::empty(),
            ranks: BTreeMap::from([("admin".to_string(), 100), ("player".to_string(), 1)]),
            logging: Some(LoggingSettings::empty()),
        }
    }

    fn descriptor() -> &'static Descriptor<Self> {
        static DESCRIPTOR: OnceLock<Descriptor<PluginConfig>> = OnceLock::new();
        DESCRIPTOR.get_or_init(|| {
            Descriptor::builder()
                .field(
                    Field::new("motd", |c: &PluginConfig| &c.motd, |c| &mut c.motd)
                        .comment("Message shown to players when they join"),
                )
                .field(
                    Field::new("server", |c: &PluginConfig| &c.server, |c| &mut c.server)
                        .required(),
                )
                .field(Field::new("region", |c: &PluginConfig| &c.region, |c| &mut c.region))
                .field(Field::new("plugins", |c: &PluginConfig| &c.plugins, |c| &mut c.plugins))
                .field(
                    Field::new("ranks", |c: &PluginConfig| &c.ranks, |c| &mut c.ranks)
                        .element("rank")
                        .wrapper("ranks")
                        .comment("Permission weight per rank"),
                )
                .field(Field::new("logging", |c: &PluginConfig| &c.logging, |c| &mut c.logging))
                .build()
        })
    }
}

impl Configuration for PluginConfig {
    const ROOT: &'static str = "plugin-config";
    const NAMESPACE: &'static str = "urn:treeconf:plugin-config";
}

impl Object for ServerSettings {
    fn empty() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            max_players: 1000,
            tick_rate: 50,
            ping_interval: 1000,
            connection_timeout: 10000,
            event_queue_capacity: 1024,
        }
    }

    fn descriptor() -> &'static Descriptor<Self> {
        static DESCRIPTOR: OnceLock<Descriptor<ServerSettings>> = OnceLock::new();
        DESCRIPTOR.get_or_init(|| {
            Descriptor::builder()
                .field(
                    Field::new("listen_addr", |s: &ServerSettings| &s.listen_addr, |s| {
                        &mut s.listen_addr
                    })
                    .element("listen-addr")
                    .comment("Address to bind to, IP:PORT")
                    .required(),
                )
                .field(
                    Field::new("max_players", |s: &ServerSettings| &s.max_players, |s| {
                        &mut s.max_players
                    })
                    .element("max-players"),
                )
                .field(
                    Field::new("tick_rate", |s: &ServerSettings| &s.tick_rate, |s| &mut s.tick_rate)
                        .element("tick-rate")
                        .wrapper("timing")
                        .comment("Milliseconds"),
                )
                .field(
                    Field::new("ping_interval", |s: &ServerSettings| &s.ping_interval, |s| {
                        &mut s.ping_interval
                    })
                    .element("ping-interval")
                    .wrapper("timing"),
                )
                .field(
                    Field::new(
                        "connection_timeout",
                        |s: &ServerSettings| &s.connection_timeout,
                        |s| &mut s.connection_timeout,
                    )
                    .element("connection-timeout")
                    .wrapper("timing"),
                )
                .field(
                    Field::new(
                        "event_queue_capacity",
                        |s: &ServerSettings| &s.event_queue_capacity,
                        |s| &mut s.event_queue_capacity,
                    )
                    .element("event-queue-capacity"),
                )
                .build()
        })
    }
}

impl Object for RegionSettings {
    fn empty() -> Self {
        Self {
            min_x: -1000.0,
            max_x: 1000.0,
            min_y: -1000.0,
            max_y: 1000.0,
            min_z: -100.0,
            max_z: 100.0,
        }
    }

    fn descriptor() -> &'static Descriptor<Self> {
        static DESCRIPTOR: OnceLock<Descriptor<RegionSettings>> = OnceLock::new();
        DESCRIPTOR.get_or_init(|| {
            Descriptor::builder()
                .field(
                    Field::new("min_x", |r: &RegionSettings| &r.min_x, |r| {
                        &mut r.min_x
                    })
                    .wrapper("x"),
                )
                .field(
                    Field::new("max_x", |r: &RegionSettings| &r.max_x, |r| {
                        &mut r.max_x
                    })
                    .wrapper("x"),
                )
                .field(
                    Field::new("min_y", |r: &RegionSettings| &r.min_y, |r| {
                        &mut r.min_y
                    })
                    .wrapper("y"),
                )
                .field(
                    Field::new("max_y", |r: &RegionSettings| &r.max_y, |r| {
                        &mut r.max_y
                    })
                    .wrapper("y"),
                )
                .field(
                    Field::new("min_z", |r: &RegionSettings| &r.min_z, |r| {
                        &mut r.min_z
                    })
                    .wrapper("z"),
                )
                .field(
                    Field::new("max_z", |r: &RegionSettings| &r.max_z, |r| {
                        &mut r.max_z
                    })
                    .wrapper("z"),
                )
                .build()
        })
    }
}

impl Object for PluginSettings {
    fn empty() -> Self {
        Self {
            directory: "plugins".to_string(),
            auto_load: vec!["horizon".to_string()],
        }
    }

    fn descriptor() -> &'static Descriptor<Self> {
        static DESCRIPTOR: OnceLock<Descriptor<PluginSettings>> = OnceLock::new();
        DESCRIPTOR.get_or_init(|| {
            Descriptor::builder()
                .field(Field::new("directory", |p: &PluginSettings| &p.directory, |p| {
                    &mut p.directory
                }))
                .field(
                    Field::new("auto_load", |p: &PluginSettings| &p.auto_load, |p| &mut p.auto_load)
                        .element("plugin")
                        .wrapper("auto-load")
                        .comment("Loaded on startup, in order"),
                )
                .build()
        })
    }
}

impl Object for LoggingSettings {
    fn empty() -> Self {
        Self {
            level: LogLevel::Info,
            json_format: false,
        }
    }

    fn descriptor() -> &'static Descriptor<Self> {
        static DESCRIPTOR: OnceLock<Descriptor<LoggingSettings>> = OnceLock::new();
        DESCRIPTOR.get_or_init(|| {
            Descriptor::builder()
                .field(Field::new("level", |l: &LoggingSettings| &l.level, |l| &mut l.level))
                .field(
                    Field::new("json_format", |l: &LoggingSettings| &l.json_format, |l| {
                        &mut l.json_format
                    })
                    .element("json-format"),
                )
                .build()
        })
    }
}

config_object!(PluginConfig, ServerSettings, RegionSettings, PluginSettings, LoggingSettings);

#[cfg(test)]
mod tests {
    use treeconf::{Error, LoadError, Processor};

    use super::*;

    fn processor() -> Processor<PluginConfig> {
        Processor::new().unwrap()
    }

    #[test]
    fn test_default_round_trip() {
        let xml = processor().save_to_string(&PluginConfig::empty()).unwrap();
        assert!(xml.contains(r#"<plugin-config xmlns="urn:treeconf:plugin-config">"#));
        assert!(xml.contains("<!-- Address to bind to, IP:PORT -->"));
        assert!(xml.contains(r#"<rank key="admin">100</rank>"#));
        assert_eq!(processor().load_str(&xml).unwrap(), PluginConfig::empty());
    }

    #[test]
    fn test_partial_document() {
        let config = processor()
            .load_str(
                r#"<plugin-config xmlns="urn:treeconf:plugin-config">
                     <server>
                       <listen-addr>0.0.0.0:3000</listen-addr>
                       <timing><tick-rate>20</tick-rate></timing>
                     </server>
                     <logging><level>debug</level></logging>
                   </plugin-config>"#,
            )
            .unwrap();

        assert_eq!(config.server.listen_addr, "0.0.0.0:3000");
        assert_eq!(config.server.tick_rate, 20);
        assert_eq!(config.server.ping_interval, 1000);
        assert_eq!(config.plugins, PluginSettings::empty());
        assert_eq!(
            config.logging,
            Some(LoggingSettings {
                level: LogLevel::Debug,
                json_format: false,
            })
        );
    }

    #[test]
    fn test_server_is_required() {
        let err = processor()
            .load_str(
                r#"<plugin-config xmlns="urn:treeconf:plugin-config">
                     <server><max-players>10</max-players></server>
                   </plugin-config>"#,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Load(LoadError::MissingElement(ref name)) if name == "listen-addr"
        ));
    }

    #[test]
    fn test_missing_logging_is_none() {
        let config = processor()
            .load_str(
                r#"<plugin-config xmlns="urn:treeconf:plugin-config">
                     <server><listen-addr>[::]:8080</listen-addr></server>
                   </plugin-config>"#,
            )
            .unwrap();
        assert_eq!(config.logging, None);
    }
}
