use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::TreeAction;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum KeymapProfile {
    #[default]
    Default,
    Vim,
    Arrows,
}

#[derive(Clone, Copy, Debug)]
pub struct TreeKeyBindings {
    profile: KeymapProfile,
}

impl Default for TreeKeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeKeyBindings {
    pub const fn new() -> Self {
        Self {
            profile: KeymapProfile::Default,
        }
    }

    pub const fn with_profile(profile: KeymapProfile) -> Self {
        Self { profile }
    }

    pub const fn profile(&self) -> KeymapProfile {
        self.profile
    }

    pub const fn set_profile(&mut self, profile: KeymapProfile) {
        self.profile = profile;
    }

    pub fn resolve<C>(&self, key: KeyEvent) -> Option<TreeAction<C>> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('a') => Some(TreeAction::SelectAll),
                KeyCode::Char('d') => Some(TreeAction::DeselectAll),
                KeyCode::Char('f') => Some(TreeAction::FocusSearch),
                _ => None,
            };
        }

        let nav_action = match self.profile {
            KeymapProfile::Default => self.resolve_default_nav(key),
            KeymapProfile::Vim => self.resolve_vim_nav(key),
            KeymapProfile::Arrows => self.resolve_arrow_nav(key),
        };
        if nav_action.is_some() {
            return nav_action;
        }

        self.resolve_common(key)
    }

    pub fn resolve_with<C, F>(&self, key: KeyEvent, custom: F) -> Option<TreeAction<C>>
    where
        F: Fn(KeyEvent) -> Option<C>,
    {
        if let Some(action) = custom(key) {
            return Some(TreeAction::Custom(action));
        }

        self.resolve(key)
    }

    const fn resolve_default_nav<C>(&self, key: KeyEvent) -> Option<TreeAction<C>> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(TreeAction::CursorPrev),
            KeyCode::Down | KeyCode::Char('j') => Some(TreeAction::CursorNext),
            KeyCode::Left | KeyCode::Char('h') => Some(TreeAction::CursorParent),
            KeyCode::Right | KeyCode::Char('l') => Some(TreeAction::CursorChild),
            _ => None,
        }
    }

    const fn resolve_vim_nav<C>(&self, key: KeyEvent) -> Option<TreeAction<C>> {
        match key.code {
            KeyCode::Char('k') => Some(TreeAction::CursorPrev),
            KeyCode::Char('j') => Some(TreeAction::CursorNext),
            KeyCode::Char('h') => Some(TreeAction::CursorParent),
            KeyCode::Char('l') => Some(TreeAction::CursorChild),
            _ => None,
        }
    }

    const fn resolve_arrow_nav<C>(&self, key: KeyEvent) -> Option<TreeAction<C>> {
        match key.code {
            KeyCode::Up => Some(TreeAction::CursorPrev),
            KeyCode::Down => Some(TreeAction::CursorNext),
            KeyCode::Left => Some(TreeAction::CursorParent),
            KeyCode::Right => Some(TreeAction::CursorChild),
            _ => None,
        }
    }

    fn resolve_common<C>(&self, key: KeyEvent) -> Option<TreeAction<C>> {
        match key.code {
            KeyCode::Char(' ') => Some(TreeAction::ToggleSelect),
            KeyCode::Enter => Some(TreeAction::ToggleNode),
            KeyCode::Char('*') => Some(TreeAction::ToggleRecursive),
            KeyCode::Char('+' | 'E') => Some(TreeAction::ExpandAll),
            KeyCode::Char('-' | 'C') => Some(TreeAction::CollapseAll),
            KeyCode::Char('a') => Some(TreeAction::SelectAll),
            KeyCode::Char('n') => Some(TreeAction::DeselectAll),
            KeyCode::Char('g') => Some(TreeAction::ToggleGuides),
            KeyCode::Char('/') => Some(TreeAction::FocusSearch),
            KeyCode::Home => Some(TreeAction::CursorFirst),
            KeyCode::End => Some(TreeAction::CursorLast),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn space_toggles_selection() {
        let bindings = TreeKeyBindings::new();

        assert_eq!(
            bindings.resolve::<()>(key(KeyCode::Char(' '))),
            Some(TreeAction::ToggleSelect)
        );
    }

    #[test]
    fn arrows_profile_ignores_vim_keys() {
        let bindings = TreeKeyBindings::with_profile(KeymapProfile::Arrows);

        assert_eq!(bindings.resolve::<()>(key(KeyCode::Char('j'))), None);
        assert_eq!(
            bindings.resolve::<()>(key(KeyCode::Down)),
            Some(TreeAction::CursorNext)
        );
    }

    #[test]
    fn control_shortcuts_take_precedence() {
        let bindings = TreeKeyBindings::new();
        let ctrl_a = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL);

        assert_eq!(bindings.resolve::<()>(ctrl_a), Some(TreeAction::SelectAll));
    }

    #[test]
    fn custom_mapping_wins() {
        let bindings = TreeKeyBindings::new();
        let action = bindings.resolve_with(key(KeyCode::Char('a')), |_| Some(7u8));

        assert_eq!(action, Some(TreeAction::Custom(7)));
    }
}
