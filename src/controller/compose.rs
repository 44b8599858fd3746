//! Decides what the content area shows.

use super::layout::Padding;
use crate::store::PanelId;

/// Content panels, in the order they are mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    Info,
    Tree,
    Map,
    Entropy,
    Footer,
}

/// One panel to mount and the props it receives.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelMount {
    pub kind: PanelKind,
    pub padding: Padding,
    /// Map only: re-project from scratch instead of keeping the current view.
    pub force_new_projection: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderPlan {
    /// Dataset incomplete: show only the spinner, `margin_top` from the top.
    Loading { margin_top: f32 },
    Content { panels: Vec<PanelMount> },
}

#[cfg(test)]
impl RenderPlan {
    pub fn is_loading(&self) -> bool {
        matches!(self, RenderPlan::Loading { .. })
    }

    pub fn kinds(&self) -> Vec<PanelKind> {
        match self {
            RenderPlan::Loading { .. } => Vec::new(),
            RenderPlan::Content { panels } => panels.iter().map(|p| p.kind).collect(),
        }
    }
}

/// Everything [`compose`] looks at.
#[derive(Debug, Clone)]
pub struct ComposeInput<'a> {
    pub metadata_loaded: bool,
    pub tree_loaded: bool,
    pub panels: &'a [PanelId],
    pub padding: Padding,
    pub narrative: bool,
    pub viewport_height: f32,
    pub spinner_offset: f32,
}

/// Builds the render plan. Pure: equal inputs give equal plans.
pub fn compose(input: &ComposeInput<'_>) -> RenderPlan {
    if !input.metadata_loaded || !input.tree_loaded {
        return RenderPlan::Loading {
            margin_top: input.viewport_height / 2.0 - input.spinner_offset,
        };
    }

    let shown = |panel: PanelId| input.panels.contains(&panel);
    let order = [
        (PanelKind::Info, !input.narrative),
        (PanelKind::Tree, shown(PanelId::Tree)),
        (PanelKind::Map, shown(PanelId::Map)),
        (PanelKind::Entropy, shown(PanelId::Entropy)),
        (PanelKind::Footer, !input.narrative),
    ];

    let panels = order
        .into_iter()
        .filter(|(_, mounted)| *mounted)
        .map(|(kind, _)| PanelMount {
            kind,
            padding: input.padding,
            force_new_projection: false,
        })
        .collect();

    RenderPlan::Content { panels }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(panels: &[PanelId], narrative: bool) -> ComposeInput<'_> {
        ComposeInput {
            metadata_loaded: true,
            tree_loaded: true,
            panels,
            padding: Padding {
                left: 220.0,
                ..Default::default()
            },
            narrative,
            viewport_height: 900.0,
            spinner_offset: 100.0,
        }
    }

    #[test]
    fn test_loading_whenever_a_part_is_missing() {
        for (metadata_loaded, tree_loaded) in [(false, false), (true, false), (false, true)] {
            for narrative in [false, true] {
                let plan = compose(&ComposeInput {
                    metadata_loaded,
                    tree_loaded,
                    ..input(&PanelId::ALL, narrative)
                });
                assert_eq!(plan, RenderPlan::Loading { margin_top: 350.0 });
            }
        }
        assert!(!compose(&input(&[], false)).is_loading());
    }

    #[test]
    fn test_tree_only_with_chrome() {
        let plan = compose(&input(&[PanelId::Tree], false));
        assert_eq!(
            plan.kinds(),
            vec![PanelKind::Info, PanelKind::Tree, PanelKind::Footer]
        );
    }

    #[test]
    fn test_narrative_suppresses_chrome() {
        let plan = compose(&input(&[PanelId::Map, PanelId::Entropy], true));
        assert_eq!(plan.kinds(), vec![PanelKind::Map, PanelKind::Entropy]);
    }

    #[test]
    fn test_fixed_order_regardless_of_selection_order() {
        let plan = compose(&input(&[PanelId::Entropy, PanelId::Map, PanelId::Tree], false));
        assert_eq!(
            plan.kinds(),
            vec![
                PanelKind::Info,
                PanelKind::Tree,
                PanelKind::Map,
                PanelKind::Entropy,
                PanelKind::Footer
            ]
        );
    }

    #[test]
    fn test_panels_share_padding_and_map_keeps_projection() {
        let plan = compose(&input(&PanelId::ALL, false));
        let RenderPlan::Content { panels } = &plan else {
            panic!("expected content");
        };
        assert!(panels.iter().all(|p| p.padding.left == 220.0));
        assert!(panels.iter().all(|p| !p.force_new_projection));
    }

    #[test]
    fn test_compose_is_idempotent() {
        let panels = [PanelId::Map, PanelId::Tree];
        let first = compose(&input(&panels, false));
        for _ in 0..5 {
            assert_eq!(compose(&input(&panels, false)), first);
        }
    }
}
