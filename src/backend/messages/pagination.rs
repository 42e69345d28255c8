//! History pagination
//!
//! Pages are counted from the newest message. `start = 0` is the newest
//! page; `end` is where the next page starts, or `-1` when none remains.

use crate::backend::error::BackendError;
use crate::backend::store::Message;
use crate::shared::messaging::MessagesPage;

pub const PAGE_SIZE: usize = 50;

/// One page of `messages` (stored oldest first) as seen by `viewer`
pub fn page(messages: &[Message], start: usize, viewer: u32) -> Result<MessagesPage, BackendError> {
    if start > messages.len() {
        return Err(BackendError::input(
            "start is greater than the total number of messages",
        ));
    }

    let views = messages
        .iter()
        .rev()
        .skip(start)
        .take(PAGE_SIZE)
        .map(|message| message.view(viewer))
        .collect();

    let end = if start + PAGE_SIZE >= messages.len() {
        -1
    } else {
        (start + PAGE_SIZE) as i64
    };

    Ok(MessagesPage {
        messages: views,
        start,
        end,
    })
}
