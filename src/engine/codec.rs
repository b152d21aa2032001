//! Reversible masking of code and variable spans.
//!
//! Code spans (backtick-delimited) and variable placeholders
//! (brace-delimited) must survive translation byte-for-byte. Before a text
//! is sent to the service, each such span is replaced with an opaque token;
//! after translation the tokens are substituted back. As long as the
//! service echoes the tokens unchanged, `unmask(mask(t))` restores `t`
//! exactly, whatever it does to the surrounding prose.

/// Mapping from opaque tokens to the original spans they replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenTable {
    entries: Vec<(String, String)>,
}

impl TokenTable {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Replaces code and variable spans with opaque tokens.
///
/// Tokens are `__CODE_n__` and `__VAR_n__` with one counter shared across
/// both kinds, so every token within a call is unique. Spans are recorded
/// in order of first appearance; unmatched delimiters are left verbatim.
pub fn mask(text: &str) -> (String, TokenTable) {
    let mut masked = String::with_capacity(text.len());
    let mut table = TokenTable::default();
    let mut counter = 0usize;
    let mut i = 0;

    while i < text.len() {
        let rest = &text.as_bytes()[i..];

        let span = match rest[0] {
            b'`' => find_code_span(text, i).map(|end| ("CODE", end)),
            b'{' => find_variable_span(text, i).map(|end| ("VAR", end)),
            _ => None,
        };

        if let Some((kind, end)) = span {
            let token = format!("__{kind}_{counter}__");
            counter += 1;
            table.entries.push((token.clone(), text[i..end].to_string()));
            masked.push_str(&token);
            i = end;
            continue;
        }

        // Copy everything up to the next candidate delimiter. An unmatched
        // delimiter at position i is consumed literally first.
        let skip = if matches!(rest[0], b'`' | b'{') { 1 } else { 0 };
        let next = text[i + skip..]
            .find(['`', '{'])
            .map_or(text.len(), |offset| i + skip + offset);
        masked.push_str(&text[i..next]);
        i = next;
    }

    (masked, table)
}

/// Substitutes every token back to its original span.
pub fn unmask(text: &str, table: &TokenTable) -> String {
    let mut restored = text.to_string();
    for (token, original) in &table.entries {
        restored = restored.replace(token.as_str(), original);
    }
    restored
}

/// Finds the end (exclusive) of a backtick-delimited span starting at
/// `start`. The closing fence must have the same run length as the opening
/// one, which handles both inline code and fenced blocks.
fn find_code_span(text: &str, start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let fence = backtick_run(bytes, start);

    let mut i = start + fence;
    while i < bytes.len() {
        if bytes[i] == b'`' {
            let close = backtick_run(bytes, i);
            if close == fence {
                return Some(i + close);
            }
            i += close;
        } else {
            i += 1;
        }
    }
    None
}

fn backtick_run(bytes: &[u8], start: usize) -> usize {
    bytes[start..].iter().take_while(|&&b| b == b'`').count()
}

/// Finds the end (exclusive) of a balanced brace span starting at `start`,
/// honoring arbitrary nesting depth.
fn find_variable_span(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, byte) in text.as_bytes()[start..].iter().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset + 1);
                }
            }
            _ => {}
        }
    }
    None
}
