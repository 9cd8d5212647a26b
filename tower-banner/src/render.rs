/// Alternate text of every rendered banner.
pub const ALT_TEXT: &str = "Banner";

/// Renders a banner as a link whose target and image source are both the banner
/// identifier.
pub fn render(banner: &str) -> String {
    let url = html_escape::encode_double_quoted_attribute(banner);
    format!(r#"<a href="{url}"><img src="{url}" alt="{ALT_TEXT}"></a>"#)
}
