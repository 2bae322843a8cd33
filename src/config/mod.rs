//! Configuration loaded from `.thevault.toml`.

pub mod settings;

pub use settings::Settings;
