/// Splits a command line on whitespace, grouping double-quoted runs.
///
/// POSIX shlex treats `\` as an escape, which mangles `C:\src\Game.sln` into
/// `C:srcGame.sln`, so Windows templates go through this instead.
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
pub fn split_command_windows(cmd: &str) -> Option<Vec<String>> {
    let mut parts = Vec::<String>::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;

    for ch in cmd.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                quoted = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() || quoted {
                    parts.push(std::mem::take(&mut current));
                }
                quoted = false;
            }
            _ => current.push(ch),
        }
    }

    if in_quotes {
        return None;
    }

    if !current.is_empty() || quoted {
        parts.push(current);
    }

    Some(parts)
}
