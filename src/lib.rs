pub mod config;
pub mod error;
pub mod processor;
pub mod rewriter;
pub mod selector;
pub mod token;

pub use config::{EnvConfig, Settings};
pub use error::{EnvTokenError, Result};
pub use processor::{process_file, run, RunSummary};
pub use selector::FileSelector;
pub use token::{substitute, DelimiterPattern, ProcessEnv, Substitution, VariableSource};
