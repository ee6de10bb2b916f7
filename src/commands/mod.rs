mod research;

use crate::state::Context;

/// Market research over live web search
#[poise::command(
    slash_command,
    subcommands("research::run", "research::defaults")
)]
pub async fn research(_ctx: Context<'_>) -> Result<(), anyhow::Error> {
    Ok(())
}

/// Split text into Discord-safe chunks (max `max` bytes), preferring newline
/// then space boundaries.
pub(crate) fn split_chunks(text: &str, max: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut remaining = text;
    while !remaining.is_empty() {
        let mut chunk_len = remaining.len().min(max);
        while !remaining.is_char_boundary(chunk_len) {
            chunk_len -= 1;
        }
        if chunk_len == 0 {
            chunk_len = remaining.chars().next().map_or(0, char::len_utf8);
        }
        let split_at = if chunk_len < remaining.len() {
            remaining[..chunk_len]
                .rfind('\n')
                .or_else(|| remaining[..chunk_len].rfind(' '))
                .map(|i| i + 1)
                .unwrap_or(chunk_len)
        } else {
            chunk_len
        };
        chunks.push(&remaining[..split_at]);
        remaining = &remaining[split_at..];
    }
    chunks
}

/// Send a message in Discord-safe chunks (max 1990 chars).
pub(crate) async fn send_chunked(ctx: &Context<'_>, text: &str) -> Result<(), anyhow::Error> {
    for chunk in split_chunks(text, 1990) {
        ctx.say(chunk).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(split_chunks("hello", 1990), vec!["hello"]);
        assert!(split_chunks("", 1990).is_empty());
    }

    #[test]
    fn prefers_newline_boundaries() {
        let chunks = split_chunks("aaaa\nbbbb\ncccc", 7);
        assert_eq!(chunks, vec!["aaaa\n", "bbbb\n", "cccc"]);
    }

    #[test]
    fn falls_back_to_spaces_then_hard_cut() {
        assert_eq!(split_chunks("aa bb", 4), vec!["aa ", "bb"]);
        assert_eq!(split_chunks("abcdef", 4), vec!["abcd", "ef"]);
    }

    #[test]
    fn never_splits_inside_a_character() {
        let text = "••••";
        let chunks = split_chunks(text, 4);
        assert_eq!(chunks.concat(), text);
        assert!(chunks.iter().all(|c| c.len() <= 4));
    }
}
