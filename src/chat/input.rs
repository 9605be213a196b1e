//! Input-source selection.
//!
//! The initial input can come from positional CLI words, from piped stdin,
//! or from the interactive prompt. Exactly one source is chosen at startup
//! and never multiplexed: consuming piped stdin leaves it at EOF, so a
//! subsequent interactive read can never work and is not attempted.

/// The resolved input plan for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInput {
    /// Initial prompt text, if any, assembled from CLI words and piped
    /// stdin.
    pub initial: Option<String>,

    /// Whether to enter the interactive prompt loop.
    pub interactive: bool,
}

/// Decides the input source once, from what is present at startup.
///
/// Rules:
/// - Piped stdin is wrapped in a fenced block, appended to any positional
///   text, and forces a single non-interactive turn.
/// - Positional text alone runs one turn, unless `--interactive` keeps the
///   conversation open afterwards.
/// - With neither, the run is interactive.
pub fn resolve(
    positional: Option<String>,
    piped: Option<String>,
    force_interactive: bool,
) -> ResolvedInput {
    let positional = positional.filter(|text| !text.trim().is_empty());
    let piped = piped.filter(|text| !text.is_empty());

    match (positional, piped) {
        (positional, Some(piped)) => {
            let mut initial = positional.unwrap_or_default();
            initial.push_str("\n```\n");
            initial.push_str(&piped);
            initial.push_str("\n```\n");
            ResolvedInput {
                initial: Some(initial),
                interactive: false,
            }
        }
        (Some(positional), None) => ResolvedInput {
            initial: Some(positional),
            interactive: force_interactive,
        },
        (None, None) => ResolvedInput {
            initial: None,
            interactive: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_invocation_is_interactive() {
        let resolved = resolve(None, None, false);
        assert_eq!(resolved.initial, None);
        assert!(resolved.interactive);
    }

    #[test]
    fn positional_text_runs_one_turn() {
        let resolved = resolve(Some("what is rust".to_string()), None, false);
        assert_eq!(resolved.initial.as_deref(), Some("what is rust"));
        assert!(!resolved.interactive);
    }

    #[test]
    fn interactive_flag_keeps_the_conversation_open() {
        let resolved = resolve(Some("what is rust".to_string()), None, true);
        assert!(resolved.interactive);
    }

    #[test]
    fn piped_input_is_fenced_and_forces_one_turn() {
        let resolved = resolve(
            Some("explain this".to_string()),
            Some("fn main() {}".to_string()),
            true,
        );
        assert_eq!(
            resolved.initial.as_deref(),
            Some("explain this\n```\nfn main() {}\n```\n")
        );
        // Piped input wins over --interactive: the prompt can't read a
        // stdin that is already at EOF.
        assert!(!resolved.interactive);
    }

    #[test]
    fn blank_positional_counts_as_absent() {
        let resolved = resolve(Some("   ".to_string()), None, false);
        assert_eq!(resolved.initial, None);
        assert!(resolved.interactive);
    }
}
