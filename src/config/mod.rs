//! Configuration: types, default paths, XML loading and validation.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{CONFIG_ENV, default_config_path, env_config_path};
pub use types::{Config, LogLevel};
pub use validate::{parse_filter_date, validate_and_normalize};
pub use xml::{create_template_config, load_config, load_config_from_xml_path, resolve_config_file};
