//! Configuration section definitions.
//!
//! Each module corresponds to a section in `tola-include.toml`:
//!
//! | Module    | TOML Section | Purpose                                  |
//! |-----------|--------------|------------------------------------------|
//! | `include` | `[include]`  | Placeholder attribute, site root, errors |
//! | `fetch`   | `[fetch]`    | HTTP client settings                     |
//! | `serve`   | `[serve]`    | Composing proxy                          |

mod fetch;
mod include;
mod serve;

pub use fetch::FetchConfig;
pub use include::IncludeConfig;
pub use serve::ServeConfig;
