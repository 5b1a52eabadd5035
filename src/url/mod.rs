//! URL handling module for Sitemap-Scout
//!
//! This module derives the [`SiteOrigin`] a discovery run works against and
//! provides the `www.`-insensitive host comparison used when auditing which
//! sitemap URLs belong to the site.

mod domain;
mod origin;

pub use domain::{comparable_host, extract_domain};
pub use origin::SiteOrigin;
