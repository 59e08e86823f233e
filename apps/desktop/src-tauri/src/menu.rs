//! Application menu
//!
//! File and View menus with the usual accelerators. Menu events hand off to
//! the controller; file actions run on the async runtime so the dialogs and
//! the page round trip never block the event loop.

use mathpaste_core::ZoomAction;
use std::str::FromStr;
use tauri::menu::{Menu, MenuEvent, MenuItem, PredefinedMenuItem, Submenu};
use tauri::{AppHandle, Runtime};

use crate::controller;

/// Something the user picked from the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Open,
    Save,
    SaveAs,
    Zoom(ZoomAction),
    Quit,
}

impl MenuAction {
    /// Menu item id
    pub fn id(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Save => "save",
            Self::SaveAs => "save-as",
            Self::Zoom(ZoomAction::In) => "zoom-in",
            Self::Zoom(ZoomAction::Out) => "zoom-out",
            Self::Zoom(ZoomAction::Reset) => "zoom-reset",
            Self::Quit => "quit",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Open => "Open...",
            Self::Save => "Save",
            Self::SaveAs => "Save As...",
            Self::Zoom(ZoomAction::In) => "Zoom In",
            Self::Zoom(ZoomAction::Out) => "Zoom Out",
            Self::Zoom(ZoomAction::Reset) => "Reset Zoom",
            Self::Quit => "Quit",
        }
    }

    fn accelerator(self) -> &'static str {
        match self {
            Self::Open => "CmdOrCtrl+O",
            Self::Save => "CmdOrCtrl+S",
            Self::SaveAs => "CmdOrCtrl+Shift+S",
            Self::Zoom(ZoomAction::In) => "CmdOrCtrl+=",
            Self::Zoom(ZoomAction::Out) => "CmdOrCtrl+-",
            Self::Zoom(ZoomAction::Reset) => "CmdOrCtrl+0",
            Self::Quit => "CmdOrCtrl+Q",
        }
    }
}

impl FromStr for MenuAction {
    type Err = String;

    fn from_str(id: &str) -> Result<Self, Self::Err> {
        match id {
            "open" => Ok(Self::Open),
            "save" => Ok(Self::Save),
            "save-as" => Ok(Self::SaveAs),
            "zoom-in" => Ok(Self::Zoom(ZoomAction::In)),
            "zoom-out" => Ok(Self::Zoom(ZoomAction::Out)),
            "zoom-reset" => Ok(Self::Zoom(ZoomAction::Reset)),
            "quit" => Ok(Self::Quit),
            other => Err(format!("Unknown menu item: {}", other)),
        }
    }
}

fn item<R: Runtime>(app: &AppHandle<R>, action: MenuAction) -> Result<MenuItem<R>, tauri::Error> {
    MenuItem::with_id(
        app,
        action.id(),
        action.label(),
        true,
        Some(action.accelerator()),
    )
}

/// Builds the menu bar
pub fn build_menu<R: Runtime>(app: &AppHandle<R>) -> Result<Menu<R>, tauri::Error> {
    let open = item(app, MenuAction::Open)?;
    let save = item(app, MenuAction::Save)?;
    let save_as = item(app, MenuAction::SaveAs)?;
    let separator1 = PredefinedMenuItem::separator(app)?;
    let quit = item(app, MenuAction::Quit)?;

    let zoom_in = item(app, MenuAction::Zoom(ZoomAction::In))?;
    let zoom_out = item(app, MenuAction::Zoom(ZoomAction::Out))?;
    let zoom_reset = item(app, MenuAction::Zoom(ZoomAction::Reset))?;

    let file = Submenu::with_items(
        app,
        "File",
        true,
        &[&open, &save, &save_as, &separator1, &quit],
    )?;
    let view = Submenu::with_items(app, "View", true, &[&zoom_in, &zoom_out, &zoom_reset])?;

    Menu::with_items(app, &[&file, &view])
}

/// Handles menu item clicks
pub fn handle_menu_event<R: Runtime>(app: &AppHandle<R>, event: MenuEvent) {
    let action = match event.id().as_ref().parse::<MenuAction>() {
        Ok(action) => action,
        Err(e) => {
            tracing::debug!("{}", e);
            return;
        }
    };
    tracing::debug!("Menu action: {:?}", action);

    match action {
        MenuAction::Open => {
            let app = app.clone();
            tauri::async_runtime::spawn(async move { controller::open(app).await });
        }
        MenuAction::Save => {
            let app = app.clone();
            tauri::async_runtime::spawn(async move { controller::save(app).await });
        }
        MenuAction::SaveAs => {
            let app = app.clone();
            tauri::async_runtime::spawn(async move { controller::save_as(app).await });
        }
        MenuAction::Zoom(zoom) => controller::zoom(app, zoom),
        MenuAction::Quit => app.exit(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(MenuAction::Open)]
    #[case(MenuAction::Save)]
    #[case(MenuAction::SaveAs)]
    #[case(MenuAction::Zoom(ZoomAction::In))]
    #[case(MenuAction::Zoom(ZoomAction::Out))]
    #[case(MenuAction::Zoom(ZoomAction::Reset))]
    #[case(MenuAction::Quit)]
    fn test_menu_ids_parse_back(#[case] action: MenuAction) {
        assert_eq!(action.id().parse::<MenuAction>(), Ok(action));
    }

    #[rstest]
    #[case(MenuAction::Open, "CmdOrCtrl+O")]
    #[case(MenuAction::Save, "CmdOrCtrl+S")]
    #[case(MenuAction::SaveAs, "CmdOrCtrl+Shift+S")]
    #[case(MenuAction::Zoom(ZoomAction::In), "CmdOrCtrl+=")]
    #[case(MenuAction::Zoom(ZoomAction::Out), "CmdOrCtrl+-")]
    #[case(MenuAction::Zoom(ZoomAction::Reset), "CmdOrCtrl+0")]
    #[case(MenuAction::Quit, "CmdOrCtrl+Q")]
    fn test_accelerator(#[case] action: MenuAction, #[case] expected: &str) {
        assert_eq!(action.accelerator(), expected);
    }

    #[test]
    fn test_unknown_menu_id() {
        assert!("print".parse::<MenuAction>().is_err());
    }

    #[test]
    fn test_accelerators_are_distinct() {
        let actions = [
            MenuAction::Open,
            MenuAction::Save,
            MenuAction::SaveAs,
            MenuAction::Zoom(ZoomAction::In),
            MenuAction::Zoom(ZoomAction::Out),
            MenuAction::Zoom(ZoomAction::Reset),
            MenuAction::Quit,
        ];
        let mut accelerators: Vec<&str> = actions.iter().map(|a| a.accelerator()).collect();
        accelerators.sort_unstable();
        accelerators.dedup();
        assert_eq!(accelerators.len(), actions.len());
    }
}
