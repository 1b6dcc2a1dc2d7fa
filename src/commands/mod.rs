mod analyze;
mod check;
mod verdict;

use crate::state::Context;

/// RERA legal assistant — verdict drafting and document compliance
#[poise::command(
    slash_command,
    subcommands("verdict::verdict", "check::check", "analyze::analyze")
)]
pub async fn rera(_ctx: Context<'_>) -> Result<(), anyhow::Error> {
    Ok(())
}

/// Send a message in Discord-safe chunks (max 1990 bytes). Uses ctx.say()
/// for all chunks so follow-ups go through the interaction webhook.
pub(crate) async fn send_chunked(ctx: &Context<'_>, text: &str) -> Result<(), anyhow::Error> {
    let mut remaining = text;
    while !remaining.is_empty() {
        let split_at = split_point(remaining);
        ctx.say(&remaining[..split_at]).await?;
        remaining = &remaining[split_at..];
    }
    Ok(())
}

/// Where to cut the next chunk: at most 1990 bytes, never inside a UTF-8
/// character, preferring a newline then a space boundary.
fn split_point(remaining: &str) -> usize {
    let mut chunk_len = remaining.len().min(1990);
    while !remaining.is_char_boundary(chunk_len) {
        chunk_len -= 1;
    }
    if chunk_len == remaining.len() {
        return chunk_len;
    }
    remaining[..chunk_len]
        .rfind('\n')
        .or_else(|| remaining[..chunk_len].rfind(' '))
        .map(|i| i + 1)
        .unwrap_or(chunk_len)
}

/// A PDF attachment is required for both compliance actions.
pub(crate) fn is_pdf(filename: &str) -> bool {
    filename.to_lowercase().ends_with(".pdf")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_never_lands_inside_a_multibyte_char() {
        // A rupee sign straddling the 1990-byte limit, with no earlier
        // newline or space to fall back to.
        let text = format!("{}₹₹₹₹", "x".repeat(1989));
        let at = split_point(&text);
        assert!(text.is_char_boundary(at));
        assert!(at <= 1990);
        assert_eq!(at, 1989);
    }

    #[test]
    fn chunking_covers_full_text_within_the_limit() {
        let text = format!("{}\n₹{} section §4", "x".repeat(1980), "y".repeat(100));
        let mut remaining = text.as_str();
        let mut reassembled = String::new();
        while !remaining.is_empty() {
            let at = split_point(remaining);
            assert!(at > 0 && at <= 1990);
            reassembled.push_str(&remaining[..at]);
            remaining = &remaining[at..];
        }
        assert_eq!(reassembled, text);
    }

    #[test]
    fn split_prefers_newline_then_space() {
        let with_newline = format!("{}\n{}", "a".repeat(1000), "b".repeat(1500));
        assert_eq!(split_point(&with_newline), 1001);

        let with_space = format!("{} {}", "a".repeat(1000), "b".repeat(1500));
        assert_eq!(split_point(&with_space), 1001);
    }

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(split_point("short reply"), "short reply".len());
    }

    #[test]
    fn pdf_check_is_case_insensitive() {
        assert!(is_pdf("agreement.pdf"));
        assert!(is_pdf("AGREEMENT.PDF"));
        assert!(!is_pdf("scan.png"));
        assert!(!is_pdf("agreement.pdf.exe"));
    }
}
