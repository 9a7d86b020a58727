mod settings;

pub use settings::{
    ApiConfig, ChatConfig, LogFormat, LoggingConfig, OtelConfig, PortalConfig, ServerConfig,
    Settings,
};
