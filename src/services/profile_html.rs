//! Just enough HTML slicing to lift a profile summary and background image out
//! of a community profile page. Not a general parser.

const INLINE_IMG_STYLE: &str = "display: inline; height: auto; max-width: 100%;";

fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

/// Value of `name` inside an opening tag such as `<div class="a" style='b'>`.
pub fn attr(tag: &str, name: &str) -> Option<String> {
    let body = tag.trim_start_matches('<').trim_end_matches('>').trim_end_matches('/');
    let mut rest = body.trim_start();
    // skip the tag name
    rest = rest.trim_start_matches(|c: char| !c.is_whitespace());

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            return None;
        }
        let key_end = rest
            .find(|c: char| c == '=' || c.is_whitespace())
            .unwrap_or(rest.len());
        let key = &rest[..key_end];
        rest = rest[key_end..].trim_start();

        let value = if let Some(after_eq) = rest.strip_prefix('=') {
            let after_eq = after_eq.trim_start();
            match after_eq.chars().next() {
                Some(q @ ('"' | '\'')) => {
                    let inner = &after_eq[1..];
                    let close = inner.find(q).unwrap_or(inner.len());
                    rest = inner.get(close + 1..).unwrap_or("");
                    &inner[..close]
                }
                _ => {
                    let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
                    rest = &after_eq[end..];
                    &after_eq[..end]
                }
            }
        } else {
            ""
        };

        if key.eq_ignore_ascii_case(name) {
            return Some(value.to_string());
        }
    }
}

fn has_classes(tag: &str, wanted: &[&str]) -> bool {
    let Some(classes) = attr(tag, "class") else {
        return false;
    };
    wanted
        .iter()
        .all(|w| classes.split_whitespace().any(|c| c == *w))
}

/// A `<div>` element: its opening tag and the markup between the matching
/// open and close tags, nested divs included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DivBlock<'a> {
    pub open_tag: &'a str,
    pub inner: &'a str,
}

/// First `<div>` whose class list contains every entry of `classes`.
pub fn find_div<'a>(html: &'a str, classes: &[&str]) -> Option<DivBlock<'a>> {
    let lc = to_lower(html);
    let mut from = 0;
    while let Some(rel) = lc.get(from..)?.find("<div") {
        let start = from + rel;
        let open_end = start + html[start..].find('>')? + 1;
        let open_tag = &html[start..open_end];
        if has_classes(open_tag, classes) {
            let close = matching_div_close(&lc, open_end)?;
            return Some(DivBlock {
                open_tag,
                inner: &html[open_end..close],
            });
        }
        from = open_end;
    }
    None
}

fn matching_div_close(lc: &str, mut pos: usize) -> Option<usize> {
    let mut depth = 1usize;
    loop {
        let next_open = lc[pos..].find("<div").map(|i| i + pos);
        let next_close = lc[pos..].find("</div").map(|i| i + pos)?;
        match next_open {
            Some(o) if o < next_close => {
                depth += 1;
                pos = o + 4;
            }
            _ => {
                depth -= 1;
                if depth == 0 {
                    return Some(next_close);
                }
                pos = next_close + 5;
            }
        }
    }
}

fn tag_name(tag: &str) -> String {
    tag.trim_start_matches('<')
        .trim_start_matches('/')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

pub fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Rewrites a summary block into an inline fragment: trimmed text, `<br>`,
/// inline images and links. Every other tag is dropped.
pub fn inline_fragment(inner: &str) -> String {
    let lc = to_lower(inner);
    let mut out = String::new();
    let mut pos = 0;

    while pos < inner.len() {
        let Some(rel) = inner[pos..].find('<') else {
            push_text(&mut out, &inner[pos..]);
            break;
        };
        push_text(&mut out, &inner[pos..pos + rel]);
        let start = pos + rel;
        let Some(end_rel) = inner[start..].find('>') else {
            break;
        };
        let end = start + end_rel + 1;
        let tag = &inner[start..end];
        pos = end;

        if tag.starts_with("</") {
            continue;
        }
        match tag_name(tag).as_str() {
            "br" => out.push_str("<br>"),
            "img" => {
                let src = attr(tag, "src").unwrap_or_default();
                let alt = attr(tag, "alt").unwrap_or_default();
                out.push_str(&format!(
                    r#"<img src="{src}" alt="{alt}" style="{INLINE_IMG_STYLE}">"#
                ));
            }
            "a" => {
                let href = attr(tag, "href").unwrap_or_default();
                let close = lc[pos..].find("</a").map_or(inner.len(), |i| pos + i);
                let text = strip_tags(&inner[pos..close]);
                out.push_str(&format!(r#"<a href="{href}">{text}</a>"#));
                pos = inner[close..].find('>').map_or(inner.len(), |i| close + i + 1);
            }
            _ => {}
        }
    }
    out
}

fn push_text(out: &mut String, text: &str) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        out.push_str(trimmed);
    }
}

/// Inline fragment of the page's `profile_summary` block, if the page has one.
pub fn summary_fragment(html: &str) -> Option<String> {
    find_div(html, &["profile_summary"]).map(|div| inline_fragment(div.inner))
}

/// Background image of a profile page: the animated background's video
/// poster, else the `url(...)` in the page container's inline style.
pub fn background_url(html: &str) -> Option<String> {
    let div = find_div(html, &["profile_animated_background"])
        .or_else(|| find_div(html, &["no_header", "profile_page", "has_profile_background"]))?;

    if let Some(poster) = video_poster(div.inner) {
        return Some(poster.replace('\'', ""));
    }
    let style = attr(div.open_tag, "style").unwrap_or_default();
    let (_, after) = style.split_once("url(")?;
    let url = after.split(')').next().unwrap_or("");
    let url = url.replace(['\'', '"'], "");
    (!url.trim().is_empty()).then(|| url.trim().to_string())
}

fn video_poster(inner: &str) -> Option<String> {
    let lc = to_lower(inner);
    let mut from = 0;
    while let Some(rel) = lc[from..].find("<video") {
        let start = from + rel;
        let end = start + inner[start..].find('>')? + 1;
        if let Some(poster) = attr(&inner[start..end], "poster") {
            return Some(poster);
        }
        from = end;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attr_reads_quoted_and_bare_values() {
        let tag = r#"<img src="a.png" alt='smile' width=32 hidden>"#;
        assert_eq!(attr(tag, "src").as_deref(), Some("a.png"));
        assert_eq!(attr(tag, "ALT").as_deref(), Some("smile"));
        assert_eq!(attr(tag, "width").as_deref(), Some("32"));
        assert_eq!(attr(tag, "hidden").as_deref(), Some(""));
        assert_eq!(attr(tag, "title"), None);
    }

    #[test]
    fn find_div_respects_nesting() {
        let html = r#"<div class="outer"><div class="profile_summary">a<div>b</div>c</div>tail</div>"#;
        let div = find_div(html, &["profile_summary"]).unwrap();
        assert_eq!(div.inner, "a<div>b</div>c");
    }

    #[test]
    fn summary_becomes_inline_fragment() {
        let html = r#"
            <html><body>
            <div class="profile_summary">
                Hello there
                <br>
                <img src="https://cdn/emote.png" alt=":shroom:" class="emoticon">
                <a class="bb_link" href="https://potato.tf" target="_blank">Potato <b>site</b></a>
                <span>bye</span>
            </div>
            </body></html>"#;
        let fragment = summary_fragment(html).unwrap();
        assert_eq!(
            fragment,
            format!(
                r#"Hello there<br><img src="https://cdn/emote.png" alt=":shroom:" style="{INLINE_IMG_STYLE}"><a href="https://potato.tf">Potato site</a>bye"#
            )
        );
    }

    #[test]
    fn missing_summary_is_none() {
        assert!(summary_fragment("<div class=\"profile_header\">x</div>").is_none());
    }

    #[test]
    fn animated_background_uses_video_poster() {
        let html = r#"<div class="profile_animated_background"><video playsinline poster="https://cdn/'bg'.jpg"></video></div>"#;
        assert_eq!(background_url(html).as_deref(), Some("https://cdn/bg.jpg"));
    }

    #[test]
    fn static_background_uses_style_url() {
        let html = r#"<div class="no_header profile_page has_profile_background full_width_background" style="background-image: url( 'https://cdn/static.jpg' );">x</div>"#;
        assert_eq!(background_url(html).as_deref(), Some("https://cdn/static.jpg"));
    }

    #[test]
    fn no_background_block_is_none() {
        assert!(background_url("<div class=\"no_header profile_page\">x</div>").is_none());
    }
}
