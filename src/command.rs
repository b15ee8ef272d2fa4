/// Lifecycle of a single fire-and-refresh mutation. Every command owns its
/// own instance, so concurrent failures stay isolated from each other.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandState<T> {
    Idle,
    Pending,
    Settled(Result<T, String>),
}

impl<T> Default for CommandState<T> {
    fn default() -> Self {
        CommandState::Idle
    }
}

impl<T> CommandState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, CommandState::Pending)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            CommandState::Settled(Err(message)) => Some(message),
            _ => None,
        }
    }

    pub fn succeeded(&self) -> bool {
        matches!(self, CommandState::Settled(Ok(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_accessors() {
        let mut state: CommandState<()> = CommandState::default();
        assert!(!state.is_pending());
        assert_eq!(state.error(), None);

        state = CommandState::Pending;
        assert!(state.is_pending());

        state = CommandState::Settled(Err("backend said no".into()));
        assert_eq!(state.error(), Some("backend said no"));
        assert!(!state.succeeded());

        state = CommandState::Settled(Ok(()));
        assert!(state.succeeded());
        assert_eq!(state.error(), None);
    }
}
