//! Access token handling.
//!
//! A token is either given explicitly or looked up lazily from an
//! [`AppBundle`]. Whatever the source, the value never leaves this module in
//! clear text through `Display` or `Debug`.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use unicode_segmentation::UnicodeSegmentation;

/// Key looked up in the bundle's info dictionary, and the debug override
/// variable in the process environment.
pub const ACCESS_TOKEN_KEY: &str = "MBXAccessToken";

/// File name of the bundled plain-text token fallback.
pub const ACCESS_TOKEN_FILE: &str = "MapboxAccessToken";

/// Number of leading characters left visible by [`redacted`].
pub const REDACTION_INDENT: usize = 4;

pub const REDACTION_PLACEHOLDER: char = '×';

/// Mask everything after the first `indent` user-visible characters.
///
/// Characters are counted as grapheme clusters, so a flag emoji or a letter
/// with a combining accent counts once.
pub fn redacted(value: &str, indent: usize) -> String {
    let mut graphemes = value.graphemes(true);
    let mut out: String = graphemes.by_ref().take(indent).collect();
    out.extend(graphemes.map(|_| REDACTION_PLACEHOLDER));
    out
}

// ============================================================================
// Bundle
// ============================================================================

/// Where a deferred token is looked up.
///
/// Mirrors an application bundle: an info dictionary of string metadata and
/// a directory holding bundled resource files.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AppBundle {
    info: HashMap<String, String>,
    resource_dir: Option<PathBuf>,
}

impl AppBundle {
    /// The bundle of the running executable: resources sit next to the binary.
    pub fn main() -> Self {
        let resource_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));

        Self {
            info: HashMap::new(),
            resource_dir,
        }
    }

    pub fn new(resource_dir: impl Into<PathBuf>) -> Self {
        Self {
            info: HashMap::new(),
            resource_dir: Some(resource_dir.into()),
        }
    }

    pub fn with_info(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.info.insert(key.into(), value.into());
        self
    }

    pub fn info(&self, key: &str) -> Option<&str> {
        self.info.get(key).map(String::as_str)
    }

    pub fn resource_dir(&self) -> Option<&Path> {
        self.resource_dir.as_deref()
    }

    /// Path of a bundled resource, if the bundle has a resource directory and
    /// the file exists there.
    pub fn resource(&self, name: &str) -> Option<PathBuf> {
        let path = self.resource_dir.as_ref()?.join(name);
        path.is_file().then_some(path)
    }
}

// Info values may hold the token itself, so only keys are printed.
impl fmt::Debug for AppBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.info.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("AppBundle")
            .field("info_keys", &keys)
            .field("resource_dir", &self.resource_dir)
            .finish()
    }
}

/// A bundle together with the token it resolved to, filled on first use.
pub struct DeferredToken {
    bundle: AppBundle,
    resolved: OnceLock<String>,
}

impl DeferredToken {
    pub fn bundle(&self) -> &AppBundle {
        &self.bundle
    }

    fn resolve(&self) -> &str {
        self.resolved.get_or_init(|| default_token(&self.bundle))
    }
}

impl fmt::Debug for DeferredToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredToken")
            .field("bundle", &self.bundle)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// AccessToken
// ============================================================================

#[derive(Clone)]
pub enum AccessToken {
    Explicit(String),
    /// Looked up from a bundle; clones share the resolved value.
    Deferred(Arc<DeferredToken>),
}

impl AccessToken {
    pub fn deferred(bundle: AppBundle) -> Self {
        Self::Deferred(Arc::new(DeferredToken {
            bundle,
            resolved: OnceLock::new(),
        }))
    }

    /// The token value. Deferred tokens are resolved on first call and the
    /// result is kept for the lifetime of this token and its clones.
    pub fn resolve(&self) -> &str {
        match self {
            Self::Explicit(token) => token.as_str(),
            Self::Deferred(deferred) => deferred.resolve(),
        }
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }
}

impl Default for AccessToken {
    fn default() -> Self {
        Self::deferred(AppBundle::main())
    }
}

impl From<&str> for AccessToken {
    fn from(token: &str) -> Self {
        Self::Explicit(token.to_owned())
    }
}

impl From<String> for AccessToken {
    fn from(token: String) -> Self {
        Self::Explicit(token)
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(token) => f.write_str(&redacted(token, REDACTION_INDENT)),
            Self::Deferred(_) => f.write_str(".default"),
        }
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

impl PartialEq for AccessToken {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            // Each token resolves on its own; a bundle edited between the two
            // lookups leaves them unequal, which keeps `Hash` consistent.
            (Self::Deferred(a), Self::Deferred(b)) => {
                Arc::ptr_eq(a, b) || (a.bundle == b.bundle && a.resolve() == b.resolve())
            }
            (Self::Deferred(_), Self::Explicit(token)) => self.resolve() == token,
            (Self::Explicit(token), Self::Deferred(_)) => token == other.resolve(),
            (Self::Explicit(a), Self::Explicit(b)) => a == b,
        }
    }
}

impl Hash for AccessToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.resolve().hash(state);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Environment override, honoured in debug builds only.
#[cfg(debug_assertions)]
fn debug_override() -> Option<String> {
    let token = std::env::var(ACCESS_TOKEN_KEY).ok()?;
    tracing::info!("Found access token from environment ({ACCESS_TOKEN_KEY})");
    Some(token)
}

#[cfg(not(debug_assertions))]
fn debug_override() -> Option<String> {
    None
}

fn default_token(bundle: &AppBundle) -> String {
    if let Some(token) = debug_override() {
        return token;
    }

    let token = bundle
        .info(ACCESS_TOKEN_KEY)
        .map(str::to_owned)
        .or_else(|| {
            let path = bundle.resource(ACCESS_TOKEN_FILE)?;
            match std::fs::read_to_string(&path) {
                Ok(contents) => Some(contents),
                Err(error) => {
                    tracing::debug!(path = %path.display(), %error, "unreadable token file");
                    None
                }
            }
        })
        .unwrap_or_default();

    let token = token.trim().to_owned();
    if token.is_empty() {
        tracing::warn!("Empty access token.");
    }

    token
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::sync::Mutex;
    use tracing_subscriber::fmt::MakeWriter;

    fn hash_of(token: &AccessToken) -> u64 {
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        hasher.finish()
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
        let buffer = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_ansi(false)
            .without_time()
            .finish();

        let value = tracing::subscriber::with_default(subscriber, f);
        let logs = String::from_utf8_lossy(&buffer.0.lock().unwrap()).into_owned();
        (value, logs)
    }

    // The debug override would shadow every bundle lookup below.
    fn env_override_set() -> bool {
        cfg!(debug_assertions) && std::env::var_os(ACCESS_TOKEN_KEY).is_some()
    }

    #[test]
    fn test_redacted_keeps_prefix() {
        assert_eq!(redacted("pk.abcdef123456", 4), "pk.a×××××××××××");
        assert_eq!(redacted("abc", 4), "abc");
        assert_eq!(redacted("", 4), "");
        assert_eq!(redacted("abcd", 0), "××××");
    }

    #[test]
    fn test_redacted_length_matches_input() {
        for value in ["a", "abcd", "abcde", "pk.eyJ1Ijoiam9obiJ9.c2lnbmF0dXJl"] {
            let masked = redacted(value, REDACTION_INDENT);
            let len = value.graphemes(true).count();
            let kept = REDACTION_INDENT.min(len);
            assert_eq!(masked.graphemes(true).count(), len);
            assert!(masked.starts_with(&value[..kept]));
            assert_eq!(masked.matches(REDACTION_PLACEHOLDER).count(), len - kept);
        }
    }

    #[test]
    fn test_redacted_counts_graphemes() {
        assert_eq!(redacted("e\u{301}abcdef", 2), "e\u{301}a×××××");
    }

    #[test]
    fn test_display_and_debug_do_not_leak() {
        let token = AccessToken::from("pk.secretvalue");
        assert_eq!(token.to_string(), "pk.s××××××××××");
        assert_eq!(format!("{token:?}"), "AccessToken(<redacted>)");
        assert!(!format!("{token:#?}").contains("secret"));

        let bundle = AppBundle::default().with_info(ACCESS_TOKEN_KEY, "pk.hidden");
        let deferred = AccessToken::deferred(bundle.clone());
        assert_eq!(deferred.to_string(), ".default");
        assert!(!format!("{bundle:?}").contains("pk.hidden"));
        if let AccessToken::Deferred(inner) = &deferred {
            assert!(!format!("{inner:?}").contains("pk.hidden"));
        }
    }

    #[test]
    fn test_explicit_resolves_unchanged() {
        let token = AccessToken::from("  pk.untrimmed ");
        assert_eq!(token.resolve(), "  pk.untrimmed ");
    }

    #[test]
    fn test_deferred_prefers_info_dictionary() {
        if env_override_set() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(ACCESS_TOKEN_FILE), "pk.fromfile").unwrap();
        let bundle = AppBundle::new(dir.path()).with_info(ACCESS_TOKEN_KEY, " pk.frominfo\n");

        assert_eq!(AccessToken::deferred(bundle).resolve(), "pk.frominfo");
    }

    #[test]
    fn test_deferred_falls_back_to_trimmed_file() {
        if env_override_set() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(ACCESS_TOKEN_FILE), "\n pk.fromfile \n").unwrap();

        let token = AccessToken::deferred(AppBundle::new(dir.path()));
        assert_eq!(token.resolve(), "pk.fromfile");
    }

    #[test]
    fn test_deferred_empty_when_nothing_found() {
        if env_override_set() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let token = AccessToken::deferred(AppBundle::new(dir.path()));
        assert_eq!(token.resolve(), "");
    }

    #[test]
    fn test_empty_token_is_logged() {
        if env_override_set() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let (empty, logs) = capture_logs(|| default_token(&AppBundle::new(dir.path())));
        assert_eq!(empty, "");
        assert!(logs.contains("WARN"), "{logs}");
        assert!(logs.contains("Empty access token."), "{logs}");

        let bundle = AppBundle::default().with_info(ACCESS_TOKEN_KEY, "pk.present");
        let (token, logs) = capture_logs(|| default_token(&bundle));
        assert_eq!(token, "pk.present");
        assert!(!logs.contains("Empty access token."), "{logs}");
    }

    #[test]
    fn test_deferred_resolves_once() {
        if env_override_set() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(ACCESS_TOKEN_FILE);
        std::fs::write(&file, "pk.first").unwrap();

        let token = AccessToken::deferred(AppBundle::new(dir.path()));
        let clone = token.clone();
        assert_eq!(token.resolve(), "pk.first");

        std::fs::write(&file, "pk.second").unwrap();
        assert_eq!(token.resolve(), "pk.first");
        assert_eq!(clone.resolve(), "pk.first");
    }

    #[test]
    fn test_equality_across_variants() {
        if env_override_set() {
            return;
        }
        let bundle = AppBundle::default().with_info(ACCESS_TOKEN_KEY, "pk.same");
        let deferred = AccessToken::deferred(bundle.clone());

        assert_eq!(deferred, AccessToken::from("pk.same"));
        assert_eq!(AccessToken::from("pk.same"), deferred);
        assert_ne!(deferred, AccessToken::from("pk.other"));
        assert_eq!(deferred, AccessToken::deferred(bundle));
        assert_ne!(AccessToken::from("a"), AccessToken::from("b"));

        assert_eq!(hash_of(&deferred), hash_of(&AccessToken::from("pk.same")));
    }

    #[test]
    fn test_deferred_equality_follows_resolved_values() {
        if env_override_set() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(ACCESS_TOKEN_FILE);
        std::fs::write(&file, "pk.before").unwrap();

        let first = AccessToken::deferred(AppBundle::new(dir.path()));
        assert_eq!(first.resolve(), "pk.before");

        // Same bundle, but the file changed before this one resolved.
        std::fs::write(&file, "pk.after").unwrap();
        let second = AccessToken::deferred(AppBundle::new(dir.path()));

        assert_ne!(first, second);
        assert_ne!(hash_of(&first), hash_of(&second));

        let third = AccessToken::deferred(AppBundle::new(dir.path()));
        assert_eq!(second, third);
        assert_eq!(hash_of(&second), hash_of(&third));
    }
}
