mod loader;
pub use loader::{Config, ConfigureArgs, configure, show_configuration};
