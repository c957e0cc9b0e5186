use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateId(Uuid);

/// An automaton state. The id is opaque; the name is what callers and
/// printed definitions refer to.
#[derive(Debug, Clone)]
pub struct State {
    id: StateId,
    name: String,
}

impl State {
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            id: StateId(Uuid::new_v4()),
            name: name.into(),
        }
    }

    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
