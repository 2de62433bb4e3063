use crate::gfx::scene::ObjectId;

/// Hover/grab state of the controller.
///
/// One variant at a time, so an object can never be highlighted and selected
/// together, and at most one of each exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionPhase {
    #[default]
    Idle,
    /// The ray rests on this object and it glows
    Highlighting(ObjectId),
    /// This object is held and follows the controller
    Selecting(ObjectId),
}

impl InteractionPhase {
    pub fn selected(&self) -> Option<ObjectId> {
        match self {
            InteractionPhase::Selecting(id) => Some(*id),
            _ => None,
        }
    }

    pub fn highlighted(&self) -> Option<ObjectId> {
        match self {
            InteractionPhase::Highlighting(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_selecting(&self) -> bool {
        matches!(self, InteractionPhase::Selecting(_))
    }
}
