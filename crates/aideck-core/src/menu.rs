//! Menu model
//!
//! Plain data the host renders into its native menu bar. Selections come
//! back as calls on `Shell`.

use serde::Serialize;

use crate::preferences::Settings;
use crate::providers::PROVIDERS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub label: String,
    pub checked: bool,
}

impl MenuItem {
    fn radio(label: &str, selected: &str) -> Self {
        Self {
            label: label.to_string(),
            checked: label == selected,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuAction {
    SaveSession,
    DeleteSession,
    ClearStorage,
    Reload,
    Back,
    Forward,
}

impl MenuAction {
    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::SaveSession => "Save Session As...",
            MenuAction::DeleteSession => "Delete Session...",
            MenuAction::ClearStorage => "Clear Storage",
            MenuAction::Reload => "Reload",
            MenuAction::Back => "Previous Page",
            MenuAction::Forward => "Next Page",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuModel {
    pub assistants: Vec<MenuItem>,
    pub themes: Vec<MenuItem>,
    pub sessions: Vec<MenuItem>,
    pub streamer_mode: bool,
    pub actions: Vec<MenuAction>,
}

impl MenuModel {
    pub fn build(settings: &Settings, themes: &[String], sessions: &[String]) -> Self {
        Self {
            assistants: PROVIDERS
                .iter()
                .map(|p| MenuItem::radio(p.label, &settings.assistant))
                .collect(),
            themes: themes
                .iter()
                .map(|t| MenuItem::radio(t, &settings.theme))
                .collect(),
            sessions: sessions
                .iter()
                .map(|s| MenuItem::radio(s, &settings.active_session))
                .collect(),
            streamer_mode: settings.streamer_mode,
            actions: vec![
                MenuAction::SaveSession,
                MenuAction::DeleteSession,
                MenuAction::ClearStorage,
                MenuAction::Reload,
                MenuAction::Back,
                MenuAction::Forward,
            ],
        }
    }

    pub fn checked_assistant(&self) -> Option<&str> {
        checked(&self.assistants)
    }

    pub fn checked_session(&self) -> Option<&str> {
        checked(&self.sessions)
    }
}

fn checked(items: &[MenuItem]) -> Option<&str> {
    items
        .iter()
        .find(|item| item.checked)
        .map(|item| item.label.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_marks_current_selection() {
        let settings = Settings {
            assistant: "Claude".to_string(),
            theme: "dark.css".to_string(),
            streamer_mode: true,
            active_session: "work".to_string(),
        };
        let themes = vec!["dark.css".to_string(), "light.css".to_string()];
        let sessions = vec!["default".to_string(), "work".to_string()];

        let menu = MenuModel::build(&settings, &themes, &sessions);

        assert_eq!(menu.assistants.len(), PROVIDERS.len());
        assert_eq!(menu.checked_assistant(), Some("Claude"));
        assert_eq!(menu.checked_session(), Some("work"));
        assert!(menu.themes[0].checked);
        assert!(!menu.themes[1].checked);
        assert!(menu.streamer_mode);
        assert_eq!(
            &menu.actions[menu.actions.len() - 2..],
            &[MenuAction::Back, MenuAction::Forward]
        );
        assert_eq!(MenuAction::Back.label(), "Previous Page");
    }

    #[test]
    fn test_unknown_selection_checks_nothing() {
        let settings = Settings {
            active_session: "gone".to_string(),
            ..Settings::default()
        };
        let menu = MenuModel::build(&settings, &[], &["default".to_string()]);
        assert_eq!(menu.checked_session(), None);
        assert_eq!(MenuAction::ClearStorage.label(), "Clear Storage");
    }
}
