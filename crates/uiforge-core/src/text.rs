//! Text helpers for untrusted oracle output.

const FENCE: &str = "```";

/// Remove a Markdown code fence wrapping the payload, if any.
///
/// Generative oracles frequently answer with ```` ```astro ... ``` ```` even when
/// told not to, sometimes with a line of prose before or after the block. A
/// fence only counts as wrapping when its opening line starts the response (or
/// follows prose) and a bare closing line matches it. Text that already starts
/// like a payload (`<`, `---`, `{`) is never unwrapped, so fences quoted inside
/// component source survive. Everything else is returned trimmed.
pub fn strip_code_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with(|c: char| matches!(c, '<' | '-' | '{')) {
        return trimmed.to_string();
    }

    let lines: Vec<&str> = trimmed.lines().collect();
    let Some(open) = lines.iter().position(|line| is_opening_fence(line)) else {
        return trimmed.to_string();
    };
    let close = lines
        .iter()
        .rposition(|line| line.trim() == FENCE)
        .filter(|&close| close > open);

    let body = match close {
        Some(close) => &lines[open + 1..close],
        // Unterminated block at the very start: keep everything after the opener
        None if open == 0 => &lines[1..],
        None => return trimmed.to_string(),
    };
    body.join("\n").trim_matches('\n').trim_end().to_string()
}

/// Three backticks at the start of a line, then an optional language tag.
fn is_opening_fence(line: &str) -> bool {
    line.trim_end().strip_prefix(FENCE).is_some_and(|info| {
        info.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '.'))
    })
}

/// Isolate the first `{...}` block of a response that may carry prose around the JSON.
pub fn extract_json_object(raw: &str) -> String {
    let unfenced = strip_code_fences(raw);
    if let (Some(start), Some(end)) = (unfenced.find('{'), unfenced.rfind('}')) {
        if start < end {
            return unfenced[start..=end].to_string();
        }
    }
    unfenced
}
