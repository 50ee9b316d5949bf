pub mod commands;
pub mod ui;

pub use commands::explain::ExplainOptions;
pub use ui::Output;
