use crate::fmt;

pub fn bold(text: &str) -> String {
    fmt!("*{}*", text)
}

/// `<url|text>` renders as `text` linking to `url`.
pub fn mask_link(url: &str, text: &str) -> String {
    fmt!("<{}|{}>", url, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_uses_pipe_syntax() {
        assert_eq!(
            mask_link("https://example.com/x", "View"),
            "<https://example.com/x|View>"
        );
    }

    #[test]
    fn bold_wraps_in_asterisks() {
        assert_eq!(bold("Alice"), "*Alice*");
    }
}
