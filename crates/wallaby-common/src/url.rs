//! URL resolution utilities.
//!
//! Link following and form submission need relative `href`/`action` values
//! resolved against the URL of the page they appear on. This is a
//! simplified resolver covering the common cases; it is not a full
//! [URL Standard](https://url.spec.whatwg.org/) parser.

/// Resolve a potentially relative URL against a base URL.
///
/// Handles, in order:
/// - absolute URLs (`http:`, `https:`, `data:`, `file:`) - returned as-is
/// - protocol-relative URLs (`//example.com/x`) - scheme taken from base
/// - absolute paths (`/x/y`) - joined with the base origin
/// - relative paths (`x/y`) - joined with the base directory
///
/// Without a base, the href is returned unchanged.
#[must_use]
pub fn resolve_url(href: &str, base_url: Option<&str>) -> String {
    if href.starts_with("http://")
        || href.starts_with("https://")
        || href.starts_with("data:")
        || href.starts_with("file:")
    {
        return href.to_string();
    }

    let Some(base) = base_url else {
        return href.to_string();
    };

    if href.starts_with("//") {
        if base.starts_with("https:") {
            format!("https:{href}")
        } else {
            format!("http:{href}")
        }
    } else if href.starts_with('/') {
        // Join with the origin: everything up to the first slash after the
        // scheme separator.
        base.find("://").map_or_else(
            || href.to_string(),
            |scheme_end| {
                let after_scheme = &base[scheme_end + 3..];
                after_scheme.find('/').map_or_else(
                    || format!("{base}{href}"),
                    |path_start| {
                        let origin = &base[..scheme_end + 3 + path_start];
                        format!("{origin}{href}")
                    },
                )
            },
        )
    } else {
        // Relative path: join with the base directory.
        let base_dir = base.rsplit_once('/').map_or(base, |(dir, _)| dir);
        format!("{base_dir}/{href}")
    }
}
