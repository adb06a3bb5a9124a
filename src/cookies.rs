use std::path::Path;

use futures::channel::mpsc::Sender;
use regex::Regex;

use chromate_cdp::cdp::browser_protocol::network::{Cookie, CookieParam};
use chromate_cdp::cdp::browser_protocol::storage::{
    ClearCookiesParams, GetCookiesParams, SetCookiesParams,
};

use crate::error::{CdpError, Result};
use crate::handler::HandlerMessage;
use crate::tab::execute;

/// Browser-wide cookie access, including regex-filtered persistence.
#[derive(Debug, Clone)]
pub struct CookieJar {
    sender: Sender<HandlerMessage>,
}

impl CookieJar {
    pub(crate) fn new(sender: Sender<HandlerMessage>) -> Self {
        Self { sender }
    }

    /// All cookies of every open tab and window.
    pub async fn get_all(&self) -> Result<Vec<Cookie>> {
        let resp = execute(GetCookiesParams::default(), self.sender.clone(), None, false).await?;
        Ok(resp.result.cookies)
    }

    pub async fn set_all(&self, cookies: Vec<CookieParam>) -> Result<()> {
        execute(
            SetCookiesParams::new(cookies),
            self.sender.clone(),
            None,
            false,
        )
        .await?;
        Ok(())
    }

    /// Clears the cookies of every open tab and window.
    pub async fn clear(&self) -> Result<()> {
        execute(ClearCookiesParams::default(), self.sender.clone(), None, false).await?;
        Ok(())
    }

    /// Saves the cookies whose name, domain or value matches `pattern` as
    /// JSON. `".*"` saves everything.
    pub async fn save(&self, file: impl AsRef<Path>, pattern: &str) -> Result<()> {
        let pattern = compile(pattern)?;
        let cookies = self.get_all().await?;
        let included: Vec<&Cookie> = cookies.iter().filter(|c| matches(&pattern, c)).collect();
        for cookie in &included {
            tracing::debug!(
                "saving cookie for matching pattern '{pattern}' => ({}: {})",
                cookie.name,
                cookie.value
            );
        }
        let json = serde_json::to_string_pretty(&included)?;
        tokio::fs::write(file.as_ref(), json).await?;
        Ok(())
    }

    /// Restores cookies from a file written by [`CookieJar::save`],
    /// filtered again by `pattern`.
    pub async fn load(&self, file: impl AsRef<Path>, pattern: &str) -> Result<()> {
        let pattern = compile(pattern)?;
        let data = tokio::fs::read_to_string(file.as_ref()).await?;
        let cookies: Vec<Cookie> = serde_json::from_str(&data)?;
        let included: Vec<CookieParam> = cookies
            .iter()
            .filter(|c| matches(&pattern, c))
            .map(CookieParam::from_cookie)
            .collect();
        for cookie in &included {
            tracing::debug!(
                "loaded cookie for matching pattern '{pattern}' => ({}: {})",
                cookie.name,
                cookie.value
            );
        }
        self.set_all(included).await
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|err| CdpError::Config(format!("invalid cookie pattern: {err}")))
}

/// A cookie matches when the pattern hits any of its searchable fields.
fn matches(pattern: &Regex, cookie: &Cookie) -> bool {
    pattern.is_match(&cookie.name)
        || pattern.is_match(&cookie.domain)
        || pattern.is_match(&cookie.value)
}
