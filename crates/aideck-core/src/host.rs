//! Host collaborator seams
//!
//! The embedding runtime owns the window, the web view, the menu bar and
//! any dialogs. The shell drives them only through these traits.

use async_trait::async_trait;

use crate::menu::MenuModel;

/// The web view showing the current provider.
pub trait View: Send + Sync {
    fn navigate(&self, url: &str);

    fn reload(&self);

    /// Previous page in the view's history
    fn go_back(&self);

    fn go_forward(&self);

    /// Inject a stylesheet into the loaded page
    fn insert_style(&self, css: &str);
}

/// The application menu bar.
pub trait MenuHost: Send + Sync {
    /// Replace the rendered menu
    fn publish(&self, menu: &MenuModel);
}

/// A single-line text dialog.
#[async_trait]
pub trait Prompt: Send + Sync {
    /// `None` when the user cancels
    async fn ask(&self, title: &str) -> Option<String>;
}
