use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The fixed allow-list of model identifiers this client will send.
///
/// `/model` and `--model` both validate against this list; an unknown name
/// leaves the session model unchanged.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownModel {
    /// gpt-3.5-turbo (the default)
    #[serde(rename = "gpt-3.5-turbo")]
    Gpt35Turbo,

    /// gpt-4
    #[serde(rename = "gpt-4")]
    Gpt4,

    /// gpt-4-turbo-preview
    #[serde(rename = "gpt-4-turbo-preview")]
    Gpt4TurboPreview,

    /// gpt-4o
    #[serde(rename = "gpt-4o")]
    Gpt4o,

    /// gpt-4o-mini
    #[serde(rename = "gpt-4o-mini")]
    Gpt4oMini,
}

impl KnownModel {
    /// Every model in the allow-list, for help output and completion.
    pub const ALL: [KnownModel; 5] = [
        KnownModel::Gpt35Turbo,
        KnownModel::Gpt4,
        KnownModel::Gpt4TurboPreview,
        KnownModel::Gpt4o,
        KnownModel::Gpt4oMini,
    ];
}

impl Default for KnownModel {
    fn default() -> Self {
        KnownModel::Gpt35Turbo
    }
}

impl fmt::Display for KnownModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KnownModel::Gpt35Turbo => write!(f, "gpt-3.5-turbo"),
            KnownModel::Gpt4 => write!(f, "gpt-4"),
            KnownModel::Gpt4TurboPreview => write!(f, "gpt-4-turbo-preview"),
            KnownModel::Gpt4o => write!(f, "gpt-4o"),
            KnownModel::Gpt4oMini => write!(f, "gpt-4o-mini"),
        }
    }
}

impl FromStr for KnownModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gpt-3.5-turbo" => Ok(KnownModel::Gpt35Turbo),
            "gpt-4" => Ok(KnownModel::Gpt4),
            "gpt-4-turbo-preview" => Ok(KnownModel::Gpt4TurboPreview),
            "gpt-4o" => Ok(KnownModel::Gpt4o),
            "gpt-4o-mini" => Ok(KnownModel::Gpt4oMini),
            _ => Err(format!("unknown model: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialization() {
        let model = KnownModel::Gpt4;
        assert_eq!(serde_json::to_string(&model).unwrap(), r#""gpt-4""#);

        let model = KnownModel::Gpt35Turbo;
        assert_eq!(serde_json::to_string(&model).unwrap(), r#""gpt-3.5-turbo""#);
    }

    #[test]
    fn parse_known_models() {
        assert_eq!("gpt-4".parse::<KnownModel>(), Ok(KnownModel::Gpt4));
        assert_eq!(
            "gpt-4-turbo-preview".parse::<KnownModel>(),
            Ok(KnownModel::Gpt4TurboPreview)
        );
        assert!("gpt-5-ultra".parse::<KnownModel>().is_err());
    }

    #[test]
    fn display_round_trip() {
        for model in KnownModel::ALL {
            assert_eq!(model.to_string().parse::<KnownModel>(), Ok(model));
        }
    }

    #[test]
    fn default_model() {
        assert_eq!(KnownModel::default(), KnownModel::Gpt35Turbo);
    }
}
