//! The ordered conversation transcript.
//!
//! A transcript is the full message history sent to the remote model on
//! every completion call. It starts with an optional seed prefix of system
//! messages (custom instructions and attached files) that `/clear`
//! preserves and `/revert` never touches. It is never persisted; only the
//! line history survives the process.

use crate::types::{Message, Role};

/// Ordered sequence of role-tagged messages with a tracked seed prefix.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    seed_len: usize,
}

impl Transcript {
    /// Creates an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a seed system message and extends the seed prefix.
    ///
    /// Seeding only makes sense before the first turn; a seed appended
    /// later would still be preserved by `/clear` but would break the
    /// leading-prefix invariant, so callers seed at startup only.
    pub fn seed(&mut self, content: impl Into<String>) {
        debug_assert_eq!(self.seed_len, self.messages.len());
        self.messages.push(Message::system(content));
        self.seed_len = self.messages.len();
    }

    /// Appends a message. Always succeeds.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Removes all messages past the seed prefix, or everything when
    /// `keep_seed` is false.
    pub fn clear(&mut self, keep_seed: bool) {
        if keep_seed {
            self.messages.truncate(self.seed_len);
        } else {
            self.messages.clear();
            self.seed_len = 0;
        }
    }

    /// Removes the final two messages (one user + one assistant turn).
    ///
    /// A no-op when fewer than two messages exist past the seed prefix;
    /// never underflows and never removes seed messages.
    pub fn revert_last(&mut self) {
        if self.messages.len() >= self.seed_len + 2 {
            self.messages.pop();
            self.messages.pop();
        }
    }

    /// Truncates to the given length. Used to roll back a failed turn.
    pub fn truncate(&mut self, len: usize) {
        self.messages.truncate(len.max(self.seed_len));
    }

    /// The number of messages, seed included.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True when the transcript holds no messages at all.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The number of leading seed system messages.
    pub fn seed_len(&self) -> usize {
        self.seed_len
    }

    /// True when a seed prefix exists.
    pub fn has_seed(&self) -> bool {
        self.seed_len > 0
    }

    /// Read-only view of the ordered messages.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The most recent assistant message, if any.
    pub fn last_assistant(&self) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|message| message.role == Role::Assistant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_order_and_length() {
        let mut transcript = Transcript::new();
        for i in 0..5 {
            transcript.append(Message::user(format!("message {i}")));
        }
        assert_eq!(transcript.len(), 5);
        for (i, message) in transcript.messages().iter().enumerate() {
            assert_eq!(message.content, format!("message {i}"));
        }
    }

    #[test]
    fn revert_on_short_transcript_is_noop() {
        let mut transcript = Transcript::new();
        transcript.revert_last();
        assert_eq!(transcript.len(), 0);

        transcript.append(Message::user("only one"));
        transcript.revert_last();
        assert_eq!(transcript.len(), 1);
    }

    #[test]
    fn revert_removes_one_turn() {
        let mut transcript = Transcript::new();
        transcript.append(Message::user("A"));
        transcript.append(Message::assistant("B"));
        transcript.revert_last();
        assert!(transcript.is_empty());
    }

    #[test]
    fn revert_never_eats_the_seed() {
        let mut transcript = Transcript::new();
        transcript.seed("be terse");
        transcript.append(Message::user("dangling"));
        transcript.revert_last();
        assert_eq!(transcript.len(), 2);

        transcript.append(Message::assistant("reply"));
        transcript.revert_last();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.messages()[0].content, "be terse");
    }

    #[test]
    fn clear_keeping_seed() {
        let mut transcript = Transcript::new();
        transcript.seed("be terse");
        transcript.append(Message::user("hello"));
        transcript.append(Message::assistant("hi"));

        transcript.clear(true);
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.messages()[0], Message::system("be terse"));
    }

    #[test]
    fn clear_discarding_seed() {
        let mut transcript = Transcript::new();
        transcript.seed("be terse");
        transcript.append(Message::user("hello"));

        transcript.clear(false);
        assert!(transcript.is_empty());
        assert!(!transcript.has_seed());
    }

    #[test]
    fn truncate_respects_seed() {
        let mut transcript = Transcript::new();
        transcript.seed("instructions");
        transcript.append(Message::user("hello"));
        transcript.truncate(0);
        assert_eq!(transcript.len(), 1);
    }

    #[test]
    fn last_assistant_lookup() {
        let mut transcript = Transcript::new();
        assert!(transcript.last_assistant().is_none());

        transcript.append(Message::user("q1"));
        transcript.append(Message::assistant("a1"));
        transcript.append(Message::user("q2"));
        transcript.append(Message::assistant("a2"));
        assert_eq!(transcript.last_assistant().unwrap().content, "a2");
    }
}
