//! Sidebar presentation state and the content padding derived from it.

use crate::config::LayoutConfig;

/// Space each content panel must leave free on every edge.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Padding {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

/// Docked vs. floating and open vs. closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidebarLayout {
    /// Rendered inline, reserving horizontal space. Toggled by the user.
    pub docked: bool,
    /// Overlaid on the content. Driven by the edge-swipe gesture.
    pub open: bool,
}

pub struct LayoutController {
    sidebar: SidebarLayout,
    controls_width: f32,
    /// Latest breakpoint value. Recorded, but never written back into `docked`.
    viewport_wide: bool,
}

impl LayoutController {
    /// The sidebar starts docked iff the viewport is wide, and closed.
    pub fn new(config: &LayoutConfig, viewport_wide: bool) -> Self {
        Self {
            sidebar: SidebarLayout {
                docked: viewport_wide,
                open: false,
            },
            controls_width: config.controls_width,
            viewport_wide,
        }
    }

    pub fn sidebar(&self) -> SidebarLayout {
        self.sidebar
    }

    pub fn controls_width(&self) -> f32 {
        self.controls_width
    }

    pub fn viewport_wide(&self) -> bool {
        self.viewport_wide
    }

    pub fn toggle_docked(&mut self) {
        self.sidebar.docked = !self.sidebar.docked;
        log::debug!("Sidebar docked = {}", self.sidebar.docked);
    }

    pub fn set_open(&mut self, open: bool) {
        if self.sidebar.open != open {
            log::debug!("Sidebar open = {}", open);
        }
        self.sidebar.open = open;
    }

    /// Called by the viewport monitor.
    pub fn viewport_changed(&mut self, wide: bool) {
        self.viewport_wide = wide;
    }

    /// Sidebar space to leave free; only the left edge is ever non-zero.
    pub fn compute_padding(&self) -> Padding {
        let left = if self.sidebar.docked || self.sidebar.open {
            self.controls_width
        } else {
            0.0
        };
        Padding {
            left,
            ..Padding::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(wide: bool) -> LayoutController {
        LayoutController::new(&LayoutConfig::default(), wide)
    }

    #[test]
    fn test_initial_state_follows_viewport() {
        let wide = controller(true);
        assert!(wide.sidebar().docked);
        assert!(!wide.sidebar().open);
        assert_eq!(wide.compute_padding().left, 220.0);

        let narrow = controller(false);
        assert!(!narrow.sidebar().docked);
        assert_eq!(narrow.compute_padding(), Padding::default());
    }

    #[test]
    fn test_padding_for_every_state() {
        let mut layout = controller(false);
        for docked in [false, true] {
            for open in [false, true] {
                if layout.sidebar().docked != docked {
                    layout.toggle_docked();
                }
                layout.set_open(open);

                let padding = layout.compute_padding();
                let expected = if docked || open { 220.0 } else { 0.0 };
                assert_eq!(padding.left, expected);
                assert_eq!(padding.right, 0.0);
                assert_eq!(padding.top, 0.0);
                assert_eq!(padding.bottom, 0.0);
            }
        }
    }

    #[test]
    fn test_double_toggle_restores_padding() {
        let mut layout = controller(true);
        let before = layout.compute_padding();

        layout.toggle_docked();
        assert_eq!(layout.compute_padding().left, 0.0);
        layout.toggle_docked();

        assert_eq!(layout.compute_padding(), before);
    }

    #[test]
    fn test_viewport_change_does_not_redock() {
        let mut layout = controller(true);
        layout.viewport_changed(false);

        assert!(layout.sidebar().docked);
        assert!(!layout.viewport_wide());
    }
}
