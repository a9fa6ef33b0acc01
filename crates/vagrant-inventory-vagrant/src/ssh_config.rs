//! Parser for `vagrant ssh-config <host>` output

/// `HostName` of the first `Host` block matching `host`
///
/// Keywords are case-insensitive and may be separated from their value by
/// whitespace or `=`. Patterns match exactly or via `*`.
#[must_use]
pub fn lookup_hostname(output: &str, host: &str) -> Option<String> {
    let mut in_matching_block = false;

    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((keyword, value)) = split_keyword(line) else {
            continue;
        };

        if keyword.eq_ignore_ascii_case("host") {
            in_matching_block = value
                .split_whitespace()
                .any(|pattern| pattern == "*" || pattern == host);
        } else if in_matching_block && keyword.eq_ignore_ascii_case("hostname") {
            return Some(value.trim_matches('"').to_string());
        }
    }

    None
}

fn split_keyword(line: &str) -> Option<(&str, &str)> {
    let idx = line.find(|c: char| c.is_whitespace() || c == '=')?;
    let (keyword, rest) = line.split_at(idx);
    let value = rest
        .trim_start()
        .strip_prefix('=')
        .unwrap_or(rest)
        .trim();
    (!value.is_empty()).then_some((keyword, value))
}
