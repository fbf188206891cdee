//! Quoting for arguments embedded in a `sh -c` command line

/// Quote `arg` as a single POSIX shell word
///
/// Inside single quotes nothing is special except `'` itself, so every
/// embedded `'` is closed, escaped and reopened as `'\''`, and the result is
/// wrapped in single quotes. The shell then sees exactly `arg`.
pub fn quote(arg: &str) -> String {
    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('\'');
    quoted.push_str(&escape_single_quotes(arg));
    quoted.push('\'');
    quoted
}

/// Replace every `'` with `'\''` without adding the surrounding quotes
pub fn escape_single_quotes(arg: &str) -> String {
    arg.replace('\'', r"'\''")
}
