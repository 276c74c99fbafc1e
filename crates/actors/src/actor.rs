use std::{any::Any, error, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisionStrategy {
    Resume,
    Stop,
}

/// State owned by an event loop. Messages are handled one at a time, so a
/// handler never observes another handler halfway through.
pub trait Actor: Send + 'static {
    /// Called when a handler on the actor panics. The return value decides
    /// whether the actor keeps handling messages.
    /// NOTE: If this method panics, the actor can not recover from the panic.
    #[allow(unused_variables)]
    fn on_fail(&mut self, error: Box<dyn Any + Send>) -> SupervisionStrategy {
        SupervisionStrategy::Resume
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorError {
    /// The actor stopped and its mailbox is gone.
    Closed,
    /// The mailbox is at capacity; only returned by `try_tell`.
    Full,
    /// The actor dropped the message without answering, usually after a panic.
    NoResponse,
}

impl fmt::Display for ActorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "actor mailbox is closed"),
            Self::Full => write!(f, "actor mailbox is full"),
            Self::NoResponse => write!(f, "actor did not respond"),
        }
    }
}

impl error::Error for ActorError {}
