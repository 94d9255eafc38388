//! Fragment path resolution.
//!
//! Maps a declared `data-include` path onto the URL that is actually fetched:
//!
//! | declared            | root      | resolved                |
//! |---------------------|-----------|-------------------------|
//! | `parts/nav.html`    | ``        | `parts/nav.html`        |
//! | `parts/nav.html`    | `..`      | `../parts/nav.html`     |
//! | `parts/nav.html`    | `../../`  | `../../parts/nav.html`  |
//! | `/parts/nav.html`   | `..`      | `/parts/nav.html`       |

/// Resolve a declared fragment path against a site-root prefix.
///
/// Absolute paths (leading `/`) and an empty root leave the path untouched.
#[inline]
pub fn resolve(declared: &str, root: &str) -> String {
    if root.is_empty() || declared.starts_with('/') {
        return declared.to_string();
    }
    format!("{}/{}", trim_trailing_slash(root), declared)
}

/// Strip a single trailing `/`.
#[inline]
fn trim_trailing_slash(root: &str) -> &str {
    root.strip_suffix('/').unwrap_or(root)
}
