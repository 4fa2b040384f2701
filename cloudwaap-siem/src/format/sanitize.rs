//! Extension value sanitizing

/// Make a value safe for a CEF/LEEF extension.
///
/// Replacements run in order: `\r\n\r\n` is dropped, `\r\n` becomes ` ; `,
/// lone `\n` and `\r` become spaces, `=` becomes a space and `\` becomes `/`.
pub fn sanitize(value: &str) -> String {
    sanitize_header(value).replace('=', " ")
}

/// Like [`sanitize`] but keeps `=`, for request header values such as
/// cookies (`a=b`).
pub fn sanitize_header(value: &str) -> String {
    value
        .replace("\r\n\r\n", "")
        .replace("\r\n", " ; ")
        .replace('\n', " ")
        .replace('\r', " ")
        .replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_rules() {
        assert_eq!(sanitize("a\r\n\r\nb"), "ab");
        assert_eq!(sanitize("a\r\nb"), "a ; b");
        assert_eq!(sanitize("a\nb\rc"), "a b c");
        assert_eq!(sanitize("k=v"), "k v");
        assert_eq!(sanitize(r"C:\path"), "C:/path");
    }

    #[test]
    fn test_double_crlf_runs_first() {
        assert_eq!(sanitize("GET /\r\nHost: h\r\n\r\n"), "GET / ; Host: h");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let inputs = [
            "plain",
            "a=b\\c\r\n\r\nd\re\nf\r\ng",
            "\r\r\n\n==\\\\",
            "x ; y",
        ];
        for input in inputs {
            let once = sanitize(input);
            assert_eq!(sanitize(&once), once);
            assert!(!once.contains('='));
            assert!(!once.contains('\r'));
            assert!(!once.contains('\n'));
        }
    }

    #[test]
    fn test_header_keeps_equals() {
        assert_eq!(sanitize_header("a=b; c=d"), "a=b; c=d");
        assert_eq!(sanitize_header("x\\y\r\nz"), "x/y ; z");
    }
}
