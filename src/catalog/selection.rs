use uuid::Uuid;

/// Single-selection state: cardinality is 0 or 1, never more. Clicking a
/// property toggles it; clicking a different property replaces the selection
/// outright.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Unselected,
    Selected(Uuid),
}

impl Selection {
    pub fn toggle(self, id: Uuid) -> Self {
        match self {
            Selection::Selected(current) if current == id => Selection::Unselected,
            _ => Selection::Selected(id),
        }
    }

    pub fn clear(self) -> Self {
        Selection::Unselected
    }

    pub fn selected_id(self) -> Option<Uuid> {
        match self {
            Selection::Selected(id) => Some(id),
            Selection::Unselected => None,
        }
    }

    pub fn is_selected(self, id: Uuid) -> bool {
        self == Selection::Selected(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_selects_then_clears() {
        let a = Uuid::from_u128(1);

        let selection = Selection::default().toggle(a);
        assert_eq!(selection, Selection::Selected(a));

        let selection = selection.toggle(a);
        assert_eq!(selection, Selection::Unselected);
    }

    #[test]
    fn selecting_another_id_replaces_not_accumulates() {
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);

        let selection = Selection::default().toggle(a).toggle(b);
        assert_eq!(selection, Selection::Selected(b));
        assert!(!selection.is_selected(a));
    }

    #[test]
    fn clear_from_any_state_is_unselected() {
        let a = Uuid::from_u128(1);
        assert_eq!(Selection::Selected(a).clear(), Selection::Unselected);
        assert_eq!(Selection::Unselected.clear(), Selection::Unselected);
    }
}
