pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod ingest;
pub mod pipeline;
pub mod schema;
pub mod store;
pub mod ui;

pub use cli::{Cli, Commands};
pub use config::Settings;
pub use pipeline::Pipeline;
pub use store::Store;
pub use ui::{LogUi, Phase, SilentUi, Ui, UiApp};
