//! Configuration types for the chat client.
//!
//! CLI argument parsing via `arrrg` and the resolved session configuration.

use std::path::PathBuf;

use arrrg_derive::CommandLine;

use crate::types::KnownModel;

/// Default sampling temperature sent with every request.
const DEFAULT_TEMPERATURE: f32 = 0.0;

/// Command-line arguments for the parley binary.
///
/// Trailing positional words form the initial prompt.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Path to a file containing the API key.
    #[arrrg(
        optional,
        "Path to the API key file (default: ~/.config/parley/api-key.txt)",
        "PATH"
    )]
    pub keyfile: Option<String>,

    /// Model to use for chat.
    #[arrrg(optional, "Model to use (default: gpt-3.5-turbo)", "MODEL")]
    pub model: Option<String>,

    /// Files to attach as context, comma-separated.
    #[arrrg(optional, "Comma-separated files to attach as context", "FILES")]
    pub attach: Option<String>,

    /// Path to a custom-instructions file.
    #[arrrg(
        optional,
        "Custom-instructions file (default: ~/.config/parley/custom-instructions.txt)",
        "PATH"
    )]
    pub instructions: Option<String>,

    /// Path to the line-history file.
    #[arrrg(
        optional,
        "Line-history file (default: ~/.config/parley/history.txt)",
        "PATH"
    )]
    pub history: Option<String>,

    /// Keep the conversation going after answering an initial prompt.
    #[arrrg(flag, "Stay interactive after answering an initial prompt")]
    pub interactive: bool,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,

    /// Enable debug logging.
    #[arrrg(flag, "Enable debug logging to the log file")]
    pub debug: bool,

    /// Log level, prefix-matched.
    #[arrrg(optional, "Log level, prefix-matched (err, warn, info, deb)", "LEVEL")]
    pub log_level: Option<String>,
}

/// Resolved configuration for a chat session.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// The model to complete with.
    pub model: KnownModel,

    /// Sampling temperature sent with every request.
    pub temperature: f32,

    /// Whether to keep prompting after an initial CLI prompt is answered.
    pub interactive: bool,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Creates a configuration with default values.
    ///
    /// Defaults: gpt-3.5-turbo, temperature 0.0, color on, interactive off.
    pub fn new() -> Self {
        Self {
            model: KnownModel::default(),
            temperature: DEFAULT_TEMPERATURE,
            interactive: false,
            use_color: true,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: KnownModel) -> Self {
        self.model = model;
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Forces interactive mode.
    pub fn with_interactive(mut self) -> Self {
        self.interactive = true;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&ChatArgs> for ChatConfig {
    fn from(args: &ChatArgs) -> Self {
        // An unknown --model name falls back to the default; /model later
        // revalidates against the same allow-list.
        let model = args
            .model
            .as_deref()
            .and_then(|name| name.parse::<KnownModel>().ok())
            .unwrap_or_default();

        ChatConfig {
            model,
            interactive: args.interactive,
            use_color: !args.no_color,
            ..ChatConfig::new()
        }
    }
}

/// Resolves a path under the user's config directory
/// (`~/.config/parley/<file>`).
pub fn default_config_path(file: &str) -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("parley")
            .join(file),
    )
}

/// Splits a comma-separated `--attach` value into paths.
pub fn split_attachments(value: Option<&str>) -> Vec<PathBuf> {
    value
        .map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|path| !path.is_empty())
                .map(PathBuf::from)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ChatConfig::new();
        assert_eq!(config.model, KnownModel::Gpt35Turbo);
        assert_eq!(config.temperature, 0.0);
        assert!(config.use_color);
        assert!(!config.interactive);
    }

    #[test]
    fn config_from_args_defaults() {
        let args = ChatArgs::default();
        let config = ChatConfig::from(&args);
        assert_eq!(config, ChatConfig::new());
    }

    #[test]
    fn config_from_args_custom() {
        let args = ChatArgs {
            model: Some("gpt-4".to_string()),
            interactive: true,
            no_color: true,
            ..ChatArgs::default()
        };
        let config = ChatConfig::from(&args);
        assert_eq!(config.model, KnownModel::Gpt4);
        assert!(config.interactive);
        assert!(!config.use_color);
    }

    #[test]
    fn unknown_model_falls_back_to_default() {
        let args = ChatArgs {
            model: Some("gpt-9000".to_string()),
            ..ChatArgs::default()
        };
        let config = ChatConfig::from(&args);
        assert_eq!(config.model, KnownModel::Gpt35Turbo);
    }

    #[test]
    fn config_builder_pattern() {
        let config = ChatConfig::new()
            .with_model(KnownModel::Gpt4o)
            .with_temperature(0.7)
            .with_interactive()
            .without_color();

        assert_eq!(config.model, KnownModel::Gpt4o);
        assert_eq!(config.temperature, 0.7);
        assert!(config.interactive);
        assert!(!config.use_color);
    }

    #[test]
    fn attachment_splitting() {
        assert!(split_attachments(None).is_empty());
        assert_eq!(
            split_attachments(Some("a.txt, b.md,,c.rs")),
            vec![
                PathBuf::from("a.txt"),
                PathBuf::from("b.md"),
                PathBuf::from("c.rs")
            ]
        );
    }
}
