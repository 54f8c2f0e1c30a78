//! External link handling: open in the default browser, copy to clipboard.

use anyhow::{anyhow, Result};
use copypasta::{ClipboardContext, ClipboardProvider};
use reqwest::Url;

/// Accept only absolute http(s) URLs
pub fn validate_link(link: &str) -> Result<Url> {
    let url = Url::parse(link).map_err(|e| anyhow!("invalid link {link:?}: {e}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(anyhow!("refusing to open {other}:// link")),
    }
}

/// Open a link in the system's default handler
pub fn open_link(link: &str) -> Result<()> {
    let url = validate_link(link)?;
    log::info!("[links] opening {url}");
    open::that(url.as_str()).map_err(|e| anyhow!("failed to open {url}: {e}"))
}

/// Copy text to system clipboard using copypasta
pub fn copy_to_clipboard(content: &str) -> bool {
    match ClipboardContext::new() {
        Ok(mut ctx) => ctx.set_contents(content.to_string()).is_ok(),
        Err(_) => false,
    }
}
