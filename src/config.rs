use std::path::PathBuf;
use std::time::Duration;

use crate::error::{CdpError, Result};

/// Which browser family to look for when no executable is pinned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrowserKind {
    Chrome,
    Brave,
    #[default]
    Auto,
}

/// Launch flags every instance gets, before user-supplied extras.
pub(crate) const DEFAULT_ARGS: &[&str] = &[
    "--remote-allow-origins=*",
    "--no-first-run",
    "--no-service-autorun",
    "--no-default-browser-check",
    "--homepage=about:blank",
    "--no-pings",
    "--password-store=basic",
    "--disable-infobars",
    "--disable-breakpad",
    "--disable-component-update",
    "--disable-backgrounding-occluded-windows",
    "--disable-renderer-backgrounding",
    "--disable-background-networking",
    "--disable-dev-shm-usage",
    "--disable-features=IsolateOrigins,DisableLoadExtensionCommandLineSwitch,site-per-process",
    "--disable-session-crashed-bubble",
    "--disable-search-engine-choice-screen",
];

/// Flags that must be set through the config, not smuggled in as raw args.
const RESERVED_ARGS: &[&str] = &[
    "headless",
    "data-dir",
    "data_dir",
    "no-sandbox",
    "no_sandbox",
    "lang",
];

/// Everything configurable about one browser instance.
///
/// Cloned into each [`crate::Browser`]; build one via
/// [`BrowserConfig::builder`].
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    pub(crate) user_data_dir: Option<PathBuf>,
    /// Whether the data dir was supplied by the caller; generated dirs are
    /// reclaimed on stop.
    pub(crate) custom_data_dir: bool,
    pub(crate) headless: bool,
    pub(crate) executable: Option<PathBuf>,
    pub(crate) browser: BrowserKind,
    pub(crate) args: Vec<String>,
    pub(crate) sandbox: bool,
    pub(crate) lang: Option<String>,
    pub(crate) user_agent: Option<String>,
    pub(crate) host: Option<String>,
    pub(crate) port: Option<u16>,
    pub(crate) expert: bool,
    pub(crate) extensions: Vec<PathBuf>,
    pub(crate) connection_timeout: Duration,
    pub(crate) connection_max_tries: usize,
    pub(crate) autodiscover_targets: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            user_data_dir: None,
            custom_data_dir: false,
            headless: false,
            executable: None,
            browser: BrowserKind::Auto,
            args: Vec::new(),
            sandbox: true,
            lang: None,
            user_agent: None,
            host: None,
            port: None,
            expert: false,
            extensions: Vec::new(),
            connection_timeout: Duration::from_millis(250),
            connection_max_tries: 10,
            autodiscover_targets: true,
        }
    }
}

impl BrowserConfig {
    pub fn builder() -> BrowserConfigBuilder {
        BrowserConfigBuilder::default()
    }

    /// Attach mode: both `host` and `port` point at a running instance.
    pub fn is_attach(&self) -> bool {
        self.host.is_some() && self.port.is_some()
    }

    /// The profile directory, generating a temporary one on first use.
    pub(crate) fn ensure_user_data_dir(&mut self) -> Result<PathBuf> {
        if let Some(dir) = &self.user_data_dir {
            return Ok(dir.clone());
        }
        let dir = tempfile::Builder::new()
            .prefix("chromate-profile-")
            .tempdir()?
            .into_path();
        tracing::debug!("created temporary profile dir {}", dir.display());
        self.custom_data_dir = false;
        self.user_data_dir = Some(dir.clone());
        Ok(dir)
    }

    /// The full launch argument list. `host`, `port` and the data dir must be
    /// resolved by the time this is called.
    pub(crate) fn launch_args(&self) -> Vec<String> {
        let mut args: Vec<String> = DEFAULT_ARGS.iter().map(|s| s.to_string()).collect();
        if let Some(dir) = &self.user_data_dir {
            args.push(format!("--user-data-dir={}", dir.display()));
        }
        if self.expert {
            args.push("--disable-web-security".to_string());
            args.push("--disable-site-isolation-trials".to_string());
        }
        if !self.extensions.is_empty() {
            let list = self
                .extensions
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(",");
            args.push(format!("--load-extension={list}"));
        }
        for arg in &self.args {
            if !args.contains(arg) {
                args.push(arg.clone());
            }
        }
        if self.headless {
            args.push("--headless=new".to_string());
        }
        if let Some(user_agent) = &self.user_agent {
            args.push(format!("--user-agent={user_agent}"));
        }
        if !self.sandbox {
            args.push("--no-sandbox".to_string());
        }
        if let Some(lang) = &self.lang {
            args.push(format!("--lang={lang}"));
        }
        if let Some(host) = &self.host {
            args.push(format!("--remote-debugging-host={host}"));
        }
        if let Some(port) = self.port {
            args.push(format!("--remote-debugging-port={port}"));
        }
        args.push("about:blank".to_string());
        args
    }
}

#[derive(Debug, Clone, Default)]
pub struct BrowserConfigBuilder {
    config: BrowserConfig,
}

impl BrowserConfigBuilder {
    /// Profile path; unset means a generated temp directory reclaimed on
    /// stop.
    pub fn user_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.user_data_dir = Some(dir.into());
        self.config.custom_data_dir = true;
        self
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    /// Absolute path to the browser binary, overriding auto-detection.
    pub fn executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.executable = Some(path.into());
        self
    }

    pub fn browser(mut self, kind: BrowserKind) -> Self {
        self.config.browser = kind;
        self
    }

    /// Extra launch flag, appended after the defaults.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.config.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn sandbox(mut self, sandbox: bool) -> Self {
        self.config.sandbox = sandbox;
        self
    }

    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.config.lang = Some(lang.into());
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    /// Together with `port`, attaches to an already-running instance instead
    /// of spawning one.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = Some(host.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = Some(port);
        self
    }

    /// Adds the security-disabling diagnostic flags.
    pub fn expert(mut self, expert: bool) -> Self {
        self.config.expert = expert;
        self
    }

    /// Path to an unpacked extension directory to load.
    pub fn extension(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.extensions.push(path.into());
        self
    }

    /// Pacing between discovery polls.
    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.config.connection_timeout = timeout;
        self
    }

    pub fn connection_max_tries(mut self, tries: usize) -> Self {
        self.config.connection_max_tries = tries;
        self
    }

    pub fn autodiscover_targets(mut self, autodiscover: bool) -> Self {
        self.config.autodiscover_targets = autodiscover;
        self
    }

    pub fn build(mut self) -> Result<BrowserConfig> {
        for arg in &self.config.args {
            let lowered = arg.to_lowercase();
            if let Some(reserved) = RESERVED_ARGS.iter().find(|r| lowered.contains(*r)) {
                return Err(CdpError::Config(format!(
                    "`{arg}` is not allowed, use the `{reserved}` config option instead"
                )));
            }
        }
        if is_posix() && is_root() && self.config.sandbox {
            tracing::info!("detected root usage, auto disabling sandbox mode");
            self.config.sandbox = false;
        }
        Ok(self.config)
    }
}

pub(crate) fn is_posix() -> bool {
    cfg!(unix)
}

#[cfg(unix)]
fn is_root() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(unix))]
fn is_root() -> bool {
    false
}

/// Finds the browser binary on this machine.
///
/// The `CHROME` environment variable wins when it points at an existing
/// path. Otherwise well-known binary names are searched on `PATH` and in the
/// platform's standard install locations.
pub fn default_executable(kind: BrowserKind) -> Result<PathBuf> {
    if let Ok(path) = std::env::var("CHROME") {
        let path = PathBuf::from(path);
        if path.exists() {
            return Ok(path);
        }
    }

    let kinds: &[BrowserKind] = match kind {
        BrowserKind::Auto => &[BrowserKind::Chrome, BrowserKind::Brave],
        BrowserKind::Chrome => &[BrowserKind::Chrome],
        BrowserKind::Brave => &[BrowserKind::Brave],
    };

    for kind in kinds {
        let names: &[&str] = match kind {
            BrowserKind::Brave => &["brave-browser", "brave"],
            _ => &[
                "google-chrome",
                "chromium",
                "chromium-browser",
                "chrome",
                "google-chrome-stable",
            ],
        };
        for name in names {
            if let Ok(path) = which::which(name) {
                return Ok(dunce::canonicalize(&path).unwrap_or(path));
            }
        }

        #[cfg(target_os = "macos")]
        {
            let paths: &[&str] = match kind {
                BrowserKind::Brave => &["/Applications/Brave Browser.app/Contents/MacOS/Brave Browser"],
                _ => &[
                    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
                    "/Applications/Chromium.app/Contents/MacOS/Chromium",
                ],
            };
            for path in paths {
                if std::path::Path::new(path).exists() {
                    return Ok(PathBuf::from(path));
                }
            }
        }

        #[cfg(windows)]
        {
            let suffixes: &[&str] = match kind {
                BrowserKind::Brave => &["BraveSoftware/Brave-Browser/Application/brave.exe"],
                _ => &[
                    "Google/Chrome/Application/chrome.exe",
                    "Google/Chrome Beta/Application/chrome.exe",
                    "Google/Chrome Canary/Application/chrome.exe",
                ],
            };
            for root in ["PROGRAMFILES", "PROGRAMFILES(X86)", "LOCALAPPDATA", "PROGRAMW6432"] {
                if let Ok(base) = std::env::var(root) {
                    for suffix in suffixes {
                        let path = std::path::Path::new(&base).join(suffix);
                        if path.exists() {
                            return Ok(path);
                        }
                    }
                }
            }
        }
    }

    Err(CdpError::Launch(
        "could not find a chrome or brave executable, install one in the default \
         location or set the `browser-executable` config option"
            .to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_surface() {
        let config = BrowserConfig::default();
        assert!(!config.headless);
        assert!(config.sandbox);
        assert!(config.autodiscover_targets);
        assert!(!config.is_attach());
        assert_eq!(config.connection_max_tries, 10);
        assert_eq!(config.connection_timeout, Duration::from_millis(250));
    }

    #[test]
    fn reserved_flags_are_rejected() {
        for arg in [
            "--headless",
            "--user-data-dir=/tmp/x",
            "--no-sandbox",
            "--lang=de",
        ] {
            let err = BrowserConfig::builder().arg(arg).build();
            assert!(
                matches!(err, Err(CdpError::Config(_))),
                "`{arg}` must be rejected"
            );
        }
        assert!(BrowserConfig::builder().arg("--mute-audio").build().is_ok());
    }

    #[test]
    fn launch_args_reflect_the_options() {
        let mut config = BrowserConfig::builder()
            .headless(true)
            .lang("de-DE")
            .user_agent("Tester/1.0")
            .arg("--mute-audio")
            .build()
            .unwrap();
        config.sandbox = false;
        config.host = Some("127.0.0.1".to_string());
        config.port = Some(9222);
        config.user_data_dir = Some(PathBuf::from("/tmp/profile"));

        let args = config.launch_args();
        for expected in [
            "--no-first-run",
            "--user-data-dir=/tmp/profile",
            "--mute-audio",
            "--headless=new",
            "--user-agent=Tester/1.0",
            "--no-sandbox",
            "--lang=de-DE",
            "--remote-debugging-host=127.0.0.1",
            "--remote-debugging-port=9222",
        ] {
            assert!(args.iter().any(|a| a == expected), "missing {expected}");
        }
        assert_eq!(args.last().map(String::as_str), Some("about:blank"));
    }

    #[test]
    fn expert_mode_disables_web_security() {
        let mut config = BrowserConfig::builder().expert(true).build().unwrap();
        config.user_data_dir = Some(PathBuf::from("/tmp/p"));
        let args = config.launch_args();
        assert!(args.iter().any(|a| a == "--disable-web-security"));
        assert!(args.iter().any(|a| a == "--disable-site-isolation-trials"));
    }

    #[test]
    fn attach_mode_requires_host_and_port() {
        let half = BrowserConfig::builder().host("127.0.0.1").build().unwrap();
        assert!(!half.is_attach());
        let full = BrowserConfig::builder()
            .host("127.0.0.1")
            .port(9222)
            .build()
            .unwrap();
        assert!(full.is_attach());
    }

    #[test]
    fn duplicate_user_args_are_not_repeated() {
        let mut config = BrowserConfig::builder()
            .arg("--no-pings")
            .build()
            .unwrap();
        config.user_data_dir = Some(PathBuf::from("/tmp/p"));
        let args = config.launch_args();
        assert_eq!(args.iter().filter(|a| *a == "--no-pings").count(), 1);
    }
}
