pub mod commands;
pub mod settings;

use clap::ValueEnum;

#[derive(ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}
