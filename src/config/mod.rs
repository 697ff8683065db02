mod settings;

pub use settings::{
    HttpConfig, LimitsConfig, LoggingConfig, Settings, ShellConfig, StorageConfig,
};
