//! Main shell state container
//!
//! Rust owns all state. The host window, menu and web view only render it.

use std::sync::Arc;

use aideck_session::{CookieJar, RestoreReport, SessionError, SessionStore, DEFAULT_SESSION};

use crate::appearance::{streamer_rules, Themes};
use crate::config::Config;
use crate::error::CoreError;
use crate::host::{MenuHost, Prompt, View};
use crate::menu::MenuModel;
use crate::preferences::{PartialSettings, PreferenceStore, Settings};
use crate::providers;
use crate::Result;

/// Host collaborators handed to the shell at startup
#[derive(Clone)]
pub struct Host {
    pub view: Arc<dyn View>,
    pub cookies: Arc<dyn CookieJar>,
    pub menu: Arc<dyn MenuHost>,
    pub prompt: Arc<dyn Prompt>,
}

/// Main shell instance
///
/// Every user action arrives here, updates the stores, then drives the
/// host view, cookie jar and menu.
pub struct Shell {
    /// Configuration
    config: Config,
    /// config.json
    preferences: PreferenceStore,
    /// sessions.json
    sessions: SessionStore,
    /// Theme stylesheets
    themes: Themes,
    host: Host,
}

impl Shell {
    pub fn new(config: Config, host: Host) -> Result<Self> {
        let storage = config.storage();
        storage.ensure_exists()?;

        let preferences = PreferenceStore::new(storage.config_file());
        let sessions = SessionStore::open(storage.sessions_file())?;
        let themes = Themes::new(storage);

        Ok(Self {
            config,
            preferences,
            sessions,
            themes,
            host,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn preferences(&self) -> &PreferenceStore {
        &self.preferences
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Window ready: load preferences, settle the cookie jar, build the
    /// menu, then open the selected provider.
    ///
    /// The jar ends up holding the stored active session, exactly as
    /// `switch_session` leaves it. The menu and the provider page are shown
    /// even when restoring the session fails.
    pub async fn on_window_ready(&self) -> Result<RestoreReport> {
        let restored = self.restore_active_session().await;

        self.publish_menu();

        let settings = self.preferences.current();
        let provider = providers::resolve(&settings.assistant);
        self.host.view.navigate(provider.url);

        match &restored {
            Ok(_) => tracing::info!(
                assistant = %provider.label,
                session = %settings.active_session,
                "Shell ready"
            ),
            Err(e) => tracing::error!(
                assistant = %provider.label,
                error = %e,
                "Shell started without restoring the session"
            ),
        }

        restored
    }

    async fn restore_active_session(&self) -> Result<RestoreReport> {
        let settings = self.preferences.load();
        let jar = self.host.cookies.as_ref();

        let report = self.sessions.ensure_default_from_jar(jar).await?;
        if settings.active_session == DEFAULT_SESSION {
            return Ok(report);
        }

        if self.sessions.contains(&settings.active_session) {
            return self.sessions.apply(&settings.active_session, jar).await.map_err(Into::into);
        }

        tracing::warn!(
            session = %settings.active_session,
            "Active session missing, falling back to default"
        );
        self.preferences
            .update(PartialSettings::active_session(DEFAULT_SESSION))?;

        Ok(report)
    }

    /// Page finished loading: reapply streamer rules and the theme.
    pub fn on_content_loaded(&self) {
        let settings = self.preferences.current();

        if settings.streamer_mode {
            for rule in streamer_rules() {
                self.host.view.insert_style(&rule);
            }
        }

        self.apply_theme(&settings.theme);
    }

    pub fn change_assistant(&self, label: &str) -> Result<Settings> {
        let provider =
            providers::find(label).ok_or_else(|| CoreError::UnknownAssistant(label.to_string()))?;

        let settings = self
            .preferences
            .update(PartialSettings::assistant(provider.label))?;
        self.host.view.navigate(provider.url);
        self.publish_menu();

        Ok(settings)
    }

    pub fn change_theme(&self, name: &str) -> Result<Settings> {
        let settings = self.preferences.update(PartialSettings::theme(name))?;
        self.apply_theme(name);
        self.publish_menu();

        Ok(settings)
    }

    /// Rules are injected on the next load, so the view reloads.
    pub fn set_streamer_mode(&self, enabled: bool) -> Result<Settings> {
        let settings = self
            .preferences
            .update(PartialSettings::streamer_mode(enabled))?;
        self.host.view.reload();
        self.publish_menu();

        Ok(settings)
    }

    /// Ask for a name and snapshot the jar under it.
    ///
    /// Returns the saved name, or `None` when the prompt was cancelled or
    /// the jar held no cookies.
    pub async fn save_session_as(&self) -> Result<Option<String>> {
        let Some(name) = self.ask_name("Save session as").await else {
            return Ok(None);
        };

        if self.save_session(&name).await? {
            Ok(Some(name))
        } else {
            Ok(None)
        }
    }

    /// Snapshot the jar under `name` and make it the active session.
    pub async fn save_session(&self, name: &str) -> Result<bool> {
        let saved = self
            .sessions
            .capture(name, self.host.cookies.as_ref())
            .await?;

        if saved {
            self.preferences
                .update(PartialSettings::active_session(name.trim()))?;
            self.publish_menu();
        }

        Ok(saved)
    }

    /// Replace the jar with the stored session `name`.
    ///
    /// Stored sessions change only through `save_session`; cookies gained
    /// since the last save are dropped.
    pub async fn switch_session(&self, name: &str) -> Result<RestoreReport> {
        let name = name.trim();
        if !self.sessions.contains(name) {
            return Err(SessionError::NotFound(name.to_string()).into());
        }

        let current = self.preferences.current().active_session;
        let report = self
            .sessions
            .apply(name, self.host.cookies.as_ref())
            .await?;
        self.preferences
            .update(PartialSettings::active_session(name))?;
        self.host.view.reload();
        self.publish_menu();

        tracing::info!(from = %current, to = %name, "Switched session");

        Ok(report)
    }

    /// Ask for a name and delete that session.
    pub async fn delete_session_prompt(&self) -> Result<bool> {
        match self.ask_name("Delete session").await {
            Some(name) => self.delete_session(&name).await,
            None => Ok(false),
        }
    }

    /// Deleting the active session falls back to `default`.
    ///
    /// The preference moves before the entry is removed, so `activeSession`
    /// never names a deleted session. The jar is only replaced when a stored
    /// `default` exists to replace it with.
    pub async fn delete_session(&self, name: &str) -> Result<bool> {
        let name = name.trim();
        if !self.sessions.contains(name) {
            return Ok(false);
        }

        let falls_back =
            name != DEFAULT_SESSION && self.preferences.current().active_session == name;
        if falls_back {
            self.preferences
                .update(PartialSettings::active_session(DEFAULT_SESSION))?;
        }

        if !self.sessions.delete(name)? {
            return Ok(false);
        }

        if falls_back && self.sessions.contains(DEFAULT_SESSION) {
            self.sessions
                .apply(DEFAULT_SESSION, self.host.cookies.as_ref())
                .await?;
            self.host.view.reload();
        }

        self.publish_menu();
        Ok(true)
    }

    /// Drop every cookie in the jar. Stored sessions are kept.
    pub async fn clear_storage(&self) -> Result<()> {
        self.host.cookies.clear_all().await?;
        self.host.view.reload();

        tracing::info!("Cleared cookie storage");

        Ok(())
    }

    pub fn reload(&self) {
        self.host.view.reload();
    }

    pub fn go_back(&self) {
        self.host.view.go_back();
    }

    pub fn go_forward(&self) {
        self.host.view.go_forward();
    }

    pub fn menu_model(&self) -> MenuModel {
        MenuModel::build(
            &self.preferences.current(),
            &self.themes.available(),
            &self.sessions.list_names(),
        )
    }

    fn publish_menu(&self) {
        self.host.menu.publish(&self.menu_model());
    }

    fn apply_theme(&self, name: &str) {
        if let Some(css) = self.themes.stylesheet(name) {
            self.host.view.insert_style(&css);
        }
    }

    async fn ask_name(&self, title: &str) -> Option<String> {
        self.host
            .prompt
            .ask(title)
            .await
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::MenuAction;
    use aideck_session::{Cookie, CookieInstall, CookieJarError};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingView {
        navigations: Mutex<Vec<String>>,
        styles: Mutex<Vec<String>>,
        reloads: Mutex<usize>,
        history: Mutex<Vec<&'static str>>,
    }

    impl View for RecordingView {
        fn navigate(&self, url: &str) {
            self.navigations.lock().push(url.to_string());
        }

        fn reload(&self) {
            *self.reloads.lock() += 1;
        }

        fn insert_style(&self, css: &str) {
            self.styles.lock().push(css.to_string());
        }

        fn go_back(&self) {
            self.history.lock().push("back");
        }

        fn go_forward(&self) {
            self.history.lock().push("forward");
        }
    }

    #[derive(Default)]
    struct MemoryJar {
        cookies: Mutex<Vec<Cookie>>,
        /// Cookie names `set` refuses
        reject: Mutex<Vec<String>>,
        fail_clear: Mutex<bool>,
    }

    #[async_trait]
    impl CookieJar for MemoryJar {
        async fn get_all(&self) -> std::result::Result<Vec<Cookie>, CookieJarError> {
            Ok(self.cookies.lock().clone())
        }

        async fn set(&self, install: &CookieInstall) -> std::result::Result<(), CookieJarError> {
            if self.reject.lock().contains(&install.cookie.name) {
                return Err(CookieJarError("rejected".to_string()));
            }
            self.cookies.lock().push(install.cookie.clone());
            Ok(())
        }

        async fn clear_all(&self) -> std::result::Result<(), CookieJarError> {
            if *self.fail_clear.lock() {
                return Err(CookieJarError("storage locked".to_string()));
            }
            self.cookies.lock().clear();
            Ok(())
        }
    }

    #[derive(Default)]
    struct LastMenu(Mutex<Option<MenuModel>>);

    impl MenuHost for LastMenu {
        fn publish(&self, menu: &MenuModel) {
            *self.0.lock() = Some(menu.clone());
        }
    }

    #[derive(Default)]
    struct ScriptedPrompt(Mutex<Vec<Option<String>>>);

    #[async_trait]
    impl Prompt for ScriptedPrompt {
        async fn ask(&self, _title: &str) -> Option<String> {
            let mut answers = self.0.lock();
            if answers.is_empty() {
                None
            } else {
                answers.remove(0)
            }
        }
    }

    struct Fixture {
        _dir: TempDir,
        shell: Shell,
        view: Arc<RecordingView>,
        jar: Arc<MemoryJar>,
        menu: Arc<LastMenu>,
        prompt: Arc<ScriptedPrompt>,
    }

    impl Fixture {
        fn new() -> Self {
            Self::with_dir(TempDir::new().unwrap())
        }

        fn with_dir(dir: TempDir) -> Self {
            let view = Arc::new(RecordingView::default());
            let jar = Arc::new(MemoryJar::default());
            let menu = Arc::new(LastMenu::default());
            let prompt = Arc::new(ScriptedPrompt::default());

            let host = Host {
                view: view.clone(),
                cookies: jar.clone(),
                menu: menu.clone(),
                prompt: prompt.clone(),
            };
            let shell = Shell::new(Config::new(dir.path().to_path_buf()), host).unwrap();

            Self {
                _dir: dir,
                shell,
                view,
                jar,
                menu,
                prompt,
            }
        }

        fn login(&self, name: &str, domain: &str) {
            self.jar
                .cookies
                .lock()
                .push(Cookie::new(name, "token").with_domain(domain));
        }

        fn jar_names(&self) -> Vec<String> {
            self.jar
                .cookies
                .lock()
                .iter()
                .map(|c| c.name.clone())
                .collect()
        }

        fn published(&self) -> MenuModel {
            self.menu.0.lock().clone().unwrap()
        }
    }

    #[tokio::test]
    async fn test_fresh_install_startup() {
        let fx = Fixture::new();
        fx.login("sid", ".chat.openai.com");
        assert!(fx.shell.sessions().list_names().is_empty());

        let report = fx.shell.on_window_ready().await.unwrap();

        assert_eq!(report.session, "default");
        assert_eq!(report.installed, 1);
        assert_eq!(fx.shell.sessions().list_names(), vec!["default"]);
        assert_eq!(fx.shell.preferences().current(), Settings::default());
        assert_eq!(*fx.view.navigations.lock(), vec!["https://chat.openai.com"]);
        assert_eq!(fx.published().checked_assistant(), Some("ChatGPT"));
        assert_eq!(fx.published().checked_session(), Some("default"));
    }

    #[tokio::test]
    async fn test_startup_restores_active_session() {
        let fx = Fixture::new();
        fx.login("home", "example.com");
        fx.shell.on_window_ready().await.unwrap();

        fx.jar.cookies.lock().clear();
        fx.login("work", "corp.example.com");
        assert!(fx.shell.save_session("work").await.unwrap());

        // Simulate the next launch with a different jar state
        fx.jar.cookies.lock().clear();
        fx.login("leftover", "example.com");
        let report = fx.shell.on_window_ready().await.unwrap();

        assert_eq!(report.session, "work");
        assert_eq!(fx.jar_names(), vec!["work"]);
    }

    #[tokio::test]
    async fn test_startup_jar_failure_still_shows_window() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("config.json"),
            r#"{"assistant":"Claude"}"#,
        )
        .unwrap();

        let fx = Fixture::with_dir(dir);
        fx.login("sid", "claude.ai");
        *fx.jar.fail_clear.lock() = true;

        let result = fx.shell.on_window_ready().await;

        assert!(matches!(
            result,
            Err(CoreError::Session(SessionError::Jar(_)))
        ));
        assert_eq!(*fx.view.navigations.lock(), vec!["https://claude.ai/new"]);
        assert_eq!(fx.published().checked_assistant(), Some("Claude"));
        assert_eq!(fx.published().checked_session(), Some("default"));
    }

    #[tokio::test]
    async fn test_missing_active_session_falls_back() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("config.json"),
            r#"{"activeSession":"ghost","assistant":"Claude"}"#,
        )
        .unwrap();

        let fx = Fixture::with_dir(dir);
        fx.login("sid", "claude.ai");
        fx.shell.on_window_ready().await.unwrap();

        assert_eq!(fx.shell.preferences().current().active_session, "default");
        assert_eq!(*fx.view.navigations.lock(), vec!["https://claude.ai/new"]);
    }

    #[tokio::test]
    async fn test_change_assistant() {
        let fx = Fixture::new();
        fx.shell.on_window_ready().await.unwrap();

        let settings = fx.shell.change_assistant("MistralAI").unwrap();
        assert_eq!(settings.assistant, "MistralAI");
        assert_eq!(
            fx.view.navigations.lock().last().map(String::as_str),
            Some("https://chat.mistral.ai/chat")
        );
        assert_eq!(fx.published().checked_assistant(), Some("MistralAI"));

        assert!(matches!(
            fx.shell.change_assistant("Nope"),
            Err(CoreError::UnknownAssistant(_))
        ));
        assert_eq!(fx.shell.preferences().current().assistant, "MistralAI");
    }

    #[tokio::test]
    async fn test_theme_and_streamer_mode_on_load() {
        let fx = Fixture::new();
        fs::write(
            fx.shell.config().data_dir.join("night.css"),
            "body { background: #111; }",
        )
        .unwrap();
        fx.shell.on_window_ready().await.unwrap();

        fx.shell.change_theme("night.css").unwrap();
        assert_eq!(
            *fx.view.styles.lock(),
            vec!["body { background: #111; }"]
        );

        fx.shell.set_streamer_mode(true).unwrap();
        assert_eq!(*fx.view.reloads.lock(), 1);
        assert!(fx.published().streamer_mode);

        fx.view.styles.lock().clear();
        fx.shell.on_content_loaded();

        let styles = fx.view.styles.lock().clone();
        assert_eq!(styles.len(), 4);
        assert_eq!(styles[0], "body div#app { display: none !important; }");
        assert_eq!(styles[3], "body { background: #111; }");
    }

    #[tokio::test]
    async fn test_save_session_as_prompt() {
        let fx = Fixture::new();
        fx.login("sid", "example.com");
        fx.shell.on_window_ready().await.unwrap();

        fx.prompt.0.lock().extend([None, Some("   ".to_string()), Some(" work ".to_string())]);

        assert_eq!(fx.shell.save_session_as().await.unwrap(), None);
        assert_eq!(fx.shell.save_session_as().await.unwrap(), None);
        assert_eq!(
            fx.shell.save_session_as().await.unwrap().as_deref(),
            Some("work")
        );

        assert_eq!(fx.shell.sessions().list_names(), vec!["default", "work"]);
        assert_eq!(fx.shell.preferences().current().active_session, "work");
        assert_eq!(fx.published().checked_session(), Some("work"));
    }

    #[tokio::test]
    async fn test_save_session_with_empty_jar() {
        let fx = Fixture::new();
        fx.shell.on_window_ready().await.unwrap();

        assert!(!fx.shell.save_session("work").await.unwrap());
        assert!(fx.shell.sessions().list_names().is_empty());
        assert_eq!(fx.shell.preferences().current().active_session, "default");
    }

    #[tokio::test]
    async fn test_switch_session_round_trip() {
        let fx = Fixture::new();
        fx.login("personal", "example.com");
        fx.shell.on_window_ready().await.unwrap();

        fx.jar.cookies.lock().clear();
        fx.login("corp", "corp.example.com");
        fx.shell.save_session("work").await.unwrap();

        let report = fx.shell.switch_session("default").await.unwrap();
        assert_eq!(report.installed, 1);
        assert_eq!(fx.jar_names(), vec!["personal"]);
        assert_eq!(fx.shell.preferences().current().active_session, "default");

        // Unsaved logins are dropped when switching away
        fx.login("extra", "example.com");
        fx.shell.switch_session(" work").await.unwrap();
        assert_eq!(fx.jar_names(), vec!["corp"]);
        assert_eq!(fx.shell.preferences().current().active_session, "work");
        assert_eq!(
            fx.shell.sessions().get("default").unwrap().cookie_count(),
            1
        );

        assert!(matches!(
            fx.shell.switch_session("ghost").await,
            Err(CoreError::Session(SessionError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_switch_keeps_cookies_the_jar_rejected() {
        let fx = Fixture::new();
        fx.jar.reject.lock().push("blocked".to_string());
        fx.login("personal", "example.com");
        fx.login("blocked", "example.com");
        fx.shell.on_window_ready().await.unwrap();
        assert_eq!(fx.jar_names(), vec!["personal"]);

        fx.jar.cookies.lock().clear();
        fx.login("corp", "corp.example.com");
        fx.shell.save_session("work").await.unwrap();

        let report = fx.shell.switch_session("default").await.unwrap();
        assert_eq!(report.failures.len(), 1);
        fx.shell.switch_session("work").await.unwrap();

        let stored = fx.shell.sessions().get("default").unwrap();
        assert_eq!(stored.cookie_count(), 2);
        assert_eq!(stored.cookies[1].name, "blocked");
    }

    #[tokio::test]
    async fn test_delete_active_session_falls_back_to_default() {
        let fx = Fixture::new();
        fx.login("personal", "example.com");
        fx.shell.on_window_ready().await.unwrap();

        fx.jar.cookies.lock().clear();
        fx.login("corp", "corp.example.com");
        fx.shell.save_session("work").await.unwrap();

        fx.prompt.0.lock().push(Some("nope".to_string()));
        assert!(!fx.shell.delete_session_prompt().await.unwrap());

        fx.prompt.0.lock().push(Some("work".to_string()));
        assert!(fx.shell.delete_session_prompt().await.unwrap());

        assert_eq!(fx.shell.sessions().list_names(), vec!["default"]);
        assert_eq!(fx.shell.preferences().current().active_session, "default");
        assert_eq!(fx.jar_names(), vec!["personal"]);
        assert_eq!(fx.published().sessions.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_active_default_keeps_jar() {
        let fx = Fixture::new();
        fx.login("personal", "example.com");
        fx.shell.on_window_ready().await.unwrap();
        let reloads = *fx.view.reloads.lock();

        assert!(fx.shell.delete_session("default").await.unwrap());

        assert!(fx.shell.sessions().list_names().is_empty());
        assert_eq!(fx.shell.preferences().current().active_session, "default");
        assert_eq!(fx.jar_names(), vec!["personal"]);
        assert_eq!(*fx.view.reloads.lock(), reloads);
    }

    #[tokio::test]
    async fn test_delete_active_session_without_default() {
        let fx = Fixture::new();
        fx.shell.on_window_ready().await.unwrap();
        fx.login("corp", "corp.example.com");
        fx.shell.save_session("work").await.unwrap();
        assert_eq!(fx.shell.sessions().list_names(), vec!["work"]);

        assert!(fx.shell.delete_session(" work ").await.unwrap());

        let on_disk = fs::read_to_string(fx.shell.config().config_path()).unwrap();
        assert!(on_disk.contains(r#""activeSession": "default""#));
        assert!(fx.shell.sessions().list_names().is_empty());
        assert_eq!(fx.jar_names(), vec!["corp"]);
        assert!(!fx.shell.delete_session("work").await.unwrap());
    }

    #[tokio::test]
    async fn test_back_and_forward() {
        let fx = Fixture::new();
        fx.shell.on_window_ready().await.unwrap();

        fx.shell.go_back();
        fx.shell.go_forward();

        assert_eq!(*fx.view.history.lock(), vec!["back", "forward"]);
        assert!(fx.published().actions.contains(&MenuAction::Back));
    }

    #[tokio::test]
    async fn test_clear_storage_keeps_sessions() {
        let fx = Fixture::new();
        fx.login("sid", "example.com");
        fx.shell.on_window_ready().await.unwrap();

        fx.shell.clear_storage().await.unwrap();

        assert!(fx.jar_names().is_empty());
        assert_eq!(fx.shell.sessions().list_names(), vec!["default"]);
        assert_eq!(*fx.view.reloads.lock(), 1);
    }
}
