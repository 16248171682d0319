//! Utility functions shared by the model and the renderers.
//!
//! - **URL validation**: media locators must be public http(s) URLs
//! - **Text layout**: Unicode-aware width, truncation and word wrap
//!
//! # Examples
//!
//! ```
//! use reels::util::{validate_url, display_width, truncate_to_width};
//!
//! let url = validate_url("https://images.example.com/a.jpg").unwrap();
//! assert_eq!(url.host_str(), Some("images.example.com"));
//!
//! assert_eq!(display_width("Speed Tap"), 9);
//! assert_eq!(truncate_to_width("Click the circle as fast as you can!", 12), "Click the...");
//! ```

mod text;
mod url_validator;

pub use text::{display_width, truncate_to_width, wrap_to_width};
pub use url_validator::{validate_url, UrlValidationError};
