use crate::{input::InputSelector, layer::LayerKind};

/// What is currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Idle,
    Layer { id: usize, kind: LayerKind },
}

/// Mutable session state of one viewing session.
///
/// An active index doubles as the "panel is open" flag of its detail panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectionState {
    pub(crate) selected_layer: Option<usize>,
    pub(crate) selected_input: InputSelector,
    pub(crate) linked: bool,
    pub(crate) active_filter: Option<usize>,
    pub(crate) active_feature_map: Option<usize>,
    pub(crate) active_input_map: Option<usize>,
}

impl Default for InspectionState {
    fn default() -> Self {
        Self {
            selected_layer: None,
            selected_input: InputSelector::default(),
            linked: true,
            active_filter: None,
            active_feature_map: None,
            active_input_map: None,
        }
    }
}

impl InspectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_layer(&self) -> Option<usize> {
        self.selected_layer
    }

    pub fn selected_input(&self) -> InputSelector {
        self.selected_input
    }

    pub fn linked(&self) -> bool {
        self.linked
    }

    /// Filter shown in the filter detail panel.
    pub fn active_filter(&self) -> Option<usize> {
        self.active_filter
    }

    /// Output-side feature map shown in the feature map detail panel.
    pub fn active_feature_map(&self) -> Option<usize> {
        self.active_feature_map
    }

    /// Input-side feature map shown in the left detail panel.
    pub fn active_input_map(&self) -> Option<usize> {
        self.active_input_map
    }

    pub(crate) fn enter_layer(&mut self, layer_id: usize) {
        self.selected_layer = Some(layer_id);
        self.clear_details();
    }

    pub(crate) fn clear_details(&mut self) {
        self.active_filter = None;
        self.active_feature_map = None;
        self.active_input_map = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle_and_linked() {
        let state = InspectionState::new();
        assert_eq!(state.selected_layer(), None);
        assert_eq!(state.selected_input().index(), 0);
        assert!(state.linked());
        assert_eq!(state.active_filter(), None);
    }

    #[test]
    fn entering_a_layer_clears_details() {
        let mut state = InspectionState {
            active_filter: Some(3),
            active_feature_map: Some(3),
            active_input_map: Some(7),
            ..Default::default()
        };

        state.enter_layer(2);

        assert_eq!(state.selected_layer(), Some(2));
        assert_eq!(state.active_filter(), None);
        assert_eq!(state.active_feature_map(), None);
        assert_eq!(state.active_input_map(), None);
    }
}
