mod defaults;
mod loader;

pub use defaults::{ClientConfig, DEFAULT_ENDPOINT, DEFAULT_WS_ENDPOINT};
pub use loader::{get_default_config, load_configuration, write_config_to};
