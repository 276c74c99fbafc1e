use tokio::sync::mpsc::{self, error::TrySendError};

use crate::{actor::ActorError, handler::Envelope, Actor};

pub const DEFAULT_CAPACITY: usize = 32;

pub struct Mailbox<A: Actor>(mpsc::Sender<Box<dyn Envelope<A>>>);

impl<A: Actor> Clone for Mailbox<A> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<A: Actor> Mailbox<A> {
    pub async fn send(&self, envelope: Box<dyn Envelope<A>>) -> Result<(), ActorError> {
        self.0.send(envelope).await.map_err(|_| ActorError::Closed)
    }

    pub fn try_send(&self, envelope: Box<dyn Envelope<A>>) -> Result<(), ActorError> {
        self.0.try_send(envelope).map_err(|why| match why {
            TrySendError::Full(_) => ActorError::Full,
            TrySendError::Closed(_) => ActorError::Closed,
        })
    }
}

pub struct MailboxReceiver<A: Actor>(mpsc::Receiver<Box<dyn Envelope<A>>>);

impl<A: Actor> MailboxReceiver<A> {
    pub async fn recv(&mut self) -> Option<Box<dyn Envelope<A>>> {
        self.0.recv().await
    }
}

pub fn mailbox<A: Actor>(capacity: usize) -> (Mailbox<A>, MailboxReceiver<A>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (Mailbox(tx), MailboxReceiver(rx))
}
