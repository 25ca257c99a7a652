use once_cell::sync::Lazy;
use regex::Regex;

static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern"));
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.*?)\*").expect("italic pattern"));
static CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`(.*?)`").expect("code pattern"));
static LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(.*?)\]\((.*?)\)").expect("link pattern"));

/// Minimal inline-markup pass applied to each chunk before it is appended to
/// the surface: bold, italic, inline code and link syntax become their markup
/// equivalents, blank lines become paragraph breaks, remaining newlines are
/// dropped. Bold runs first so `**` is never consumed as two italic markers.
pub fn render_inline_markup(text: &str) -> String {
    let out = BOLD.replace_all(text, "<strong>$1</strong>");
    let out = ITALIC.replace_all(&out, "<em>$1</em>");
    let out = CODE.replace_all(&out, "<code>$1</code>");
    let out = LINK.replace_all(&out, "<a href='$2'>$1</a>");
    let out = out.replace("\n\n", "<br><br>");
    out.replace('\n', "")
}

#[cfg(test)]
mod tests {
    use super::render_inline_markup;

    #[test]
    fn bold_and_italic() {
        assert_eq!(
            render_inline_markup("a **b** and *c*"),
            "a <strong>b</strong> and <em>c</em>"
        );
    }

    #[test]
    fn inline_code_and_links() {
        assert_eq!(
            render_inline_markup("see `x` in [docs](https://example.com)"),
            "see <code>x</code> in <a href='https://example.com'>docs</a>"
        );
    }

    #[test]
    fn paragraph_breaks_kept_single_newlines_dropped() {
        assert_eq!(render_inline_markup("a\n\nb\nc"), "a<br><br>bc");
    }

    #[test]
    fn plain_text_unchanged() {
        assert_eq!(render_inline_markup("plain words"), "plain words");
    }
}
