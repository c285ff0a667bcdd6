//! Single-threaded event pump
//!
//! Drains a [`Mailbox`] into [`LocationAssistant::handle`] in delivery order.
//! Handling a completion may post further completions (a settings check
//! answered by a mock, a follow-up availability query, ...); those are drained
//! in the same call.

use crate::acquisition::orchestrator::LocationAssistant;
use crate::platform::Mailbox;

/// Upper bound on completions handled per pump call
pub const MAX_COMPLETIONS_PER_PUMP: usize = 10_000;

/// Process pending completions (call this regularly in your main loop)
///
/// Returns the number of completions handled. Stops early after
/// [`MAX_COMPLETIONS_PER_PUMP`] so a collaborator that answers every request
/// with another request cannot spin the loop forever.
pub fn pump(assistant: &mut LocationAssistant, mailbox: &Mailbox) -> usize {
    let mut handled = 0;

    while handled < MAX_COMPLETIONS_PER_PUMP {
        let Some(completion) = mailbox.next() else {
            return handled;
        };
        assistant.handle(completion);
        handled += 1;
    }

    if !mailbox.is_empty() && !assistant.config().quiet {
        tracing::warn!(
            pending = mailbox.len(),
            handled,
            "event pump hit its per-call limit, completions left queued"
        );
    }
    handled
}
