//! Console banners for the command-line front end

use std::io::{self, Write};

/// Run `render` between two blank lines
pub fn with_blank_lines<W, F>(out: &mut W, render: F) -> io::Result<()>
where
    W: Write,
    F: FnOnce(&mut W) -> io::Result<()>,
{
    writeln!(out)?;
    render(out)?;
    writeln!(out)?;
    Ok(())
}

/// Center `message` in a line of `width` characters
///
/// With `prepend`, the line starts with ` {prepend}` and the left padding
/// shrinks to make room for it.
pub fn banner_text(message: &str, width: usize, prepend: Option<&str>) -> String {
    let total = width.saturating_sub(message.chars().count());
    let left = total / 2;
    let right = total - left;

    match prepend {
        Some(prefix) => {
            let left = left.saturating_sub(prefix.chars().count() + 1);
            format!(
                " {}{}{}{}",
                prefix,
                " ".repeat(left),
                message,
                " ".repeat(right)
            )
        }
        None => format!("{}{}{}", " ".repeat(left), message, " ".repeat(right)),
    }
}

/// Write a centered banner surrounded by blank lines
pub fn write_banner<W: Write>(
    out: &mut W,
    message: &str,
    width: usize,
    prepend: Option<&str>,
) -> io::Result<()> {
    with_blank_lines(out, |out| writeln!(out, "{}", banner_text(message, width, prepend)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered() {
        assert_eq!(banner_text("ab", 6, None), "  ab  ");
        assert_eq!(banner_text("abc", 6, None), " abc  ");
        assert_eq!(banner_text("abcdefgh", 4, None), "abcdefgh");
    }

    #[test]
    fn test_prepended() {
        // total 10, left 5 - (2 + 1) = 2, right 5
        assert_eq!(banner_text("hello", 15, Some("py")), " py  hello     ");
        assert_eq!(banner_text("x", 3, Some("long")), " longx ");
    }

    #[test]
    fn test_with_blank_lines() {
        let mut out = Vec::new();
        with_blank_lines(&mut out, |out| writeln!(out, "body")).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "\nbody\n\n");
    }

    #[test]
    fn test_render_error_propagates() {
        let mut out = Vec::new();
        let result = with_blank_lines(&mut out, |_| {
            Err(io::Error::new(io::ErrorKind::Other, "boom"))
        });
        assert!(result.is_err());
        assert_eq!(out, b"\n");
    }

    #[test]
    fn test_write_banner() {
        let mut out = Vec::new();
        write_banner(&mut out, "DONE", 8, None).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "\n  DONE  \n\n");
    }
}
