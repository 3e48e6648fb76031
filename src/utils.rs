/// Upper-cases the first character and keeps the rest untouched.
///
/// `animal` becomes `Animal`, `userProfile` becomes `UserProfile`.
pub fn to_pascal_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Whether `key` can be written as a bare TypeScript property name
/// (`^[A-Za-z_$][A-Za-z0-9_$]*$`).
pub fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Escapes every unescaped `/` so the pattern can sit inside a `/.../` regex literal.
///
/// A `/` is already escaped only when an odd run of backslashes precedes it.
pub fn escape_regex_slashes(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut backslashes = 0;
    for c in pattern.chars() {
        if c == '/' && backslashes % 2 == 0 {
            out.push('\\');
        }
        out.push(c);
        backslashes = if c == '\\' { backslashes + 1 } else { 0 };
    }
    out
}

/// Converts a 1-based line and column into a byte offset into `source`.
/// Positions past the end clamp to `source.len()`.
pub fn offset_of(source: &str, line: usize, column: usize) -> usize {
    let mut current_line = 1;
    let mut line_start = 0;
    if line > 1 {
        for (i, c) in source.char_indices() {
            if c == '\n' {
                current_line += 1;
                if current_line == line {
                    line_start = i + 1;
                    break;
                }
            }
        }
        if current_line < line {
            return source.len();
        }
    }
    let rest = &source[line_start..];
    let column_bytes: usize = rest
        .chars()
        .take(column.saturating_sub(1))
        .map(char::len_utf8)
        .sum();
    (line_start + column_bytes).min(source.len())
}
