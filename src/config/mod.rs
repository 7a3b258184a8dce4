//! Configuration system
//!
//! TOML-backed, loaded once into a global and read through `with_config`.

mod macros;
pub mod schemas;
pub mod utils;

pub use schemas::{AuthConfig, Config, MessagesConfig, StorageConfig, TelegramConfig};
pub use utils::{
    get_config_clone, load_config, load_config_from_path,
    read_config_file, reload_config, render_config, save_config, with_config,
};
