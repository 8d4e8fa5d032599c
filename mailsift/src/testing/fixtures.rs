//! Sample pages.

use std::time::Duration;

use crate::config::MailsiftConfig;

/// A contact page with mixed casing, a duplicate, a mailto link and some
/// near-misses.
pub const SAMPLE_PAGE: &str = r#"<html>
<head><title>Contact</title></head>
<body>
  <h1>Contact us</h1>
  <p>Sales: <a href="mailto:Sales@Example.com">Sales@Example.com</a></p>
  <p>Support: support@help.example.org (weekdays)</p>
  <p>Press: press.team+news@media.example.co.uk</p>
  <footer>sales@example.com | not-an-email@ | @missing.local | x@y.z</footer>
</body>
</html>"#;

/// What [`SAMPLE_PAGE`] extracts to with default options.
pub const SAMPLE_EMAILS: [&str; 3] = [
    "sales@example.com",
    "support@help.example.org",
    "press.team+news@media.example.co.uk",
];

/// Defaults with a short scrape timeout and no cooldown.
#[must_use]
pub fn fast_config() -> MailsiftConfig {
    MailsiftConfig::default()
        .with_scrape_timeout(0.2)
        .with_cooldown(Duration::ZERO)
}
