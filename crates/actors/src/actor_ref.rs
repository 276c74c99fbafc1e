use tokio::sync::oneshot;

use crate::{
    actor::{Actor, ActorError},
    handler::{Handler, Letter, Message},
    mailbox::Mailbox,
};

pub struct ActorRef<A: Actor> {
    mailbox: Mailbox<A>,
}

impl<A: Actor> Clone for ActorRef<A> {
    fn clone(&self) -> Self {
        Self {
            mailbox: self.mailbox.clone(),
        }
    }
}

impl<A: Actor> ActorRef<A> {
    pub(crate) fn new(mailbox: Mailbox<A>) -> Self {
        Self { mailbox }
    }

    /// Queues a message only if there is room right now.
    pub fn try_tell<M>(&self, msg: M) -> Result<(), ActorError>
    where
        M: Message,
        A: Handler<M>,
    {
        self.mailbox
            .try_send(Box::new(Letter::<M, A>::new(msg, None)))
    }

    pub async fn ask<M>(&self, msg: M) -> Result<M::Response, ActorError>
    where
        M: Message,
        A: Handler<M>,
    {
        let (response_tx, response_rx) = oneshot::channel();
        self.mailbox
            .send(Box::new(Letter::<M, A>::new(msg, Some(response_tx))))
            .await?;
        response_rx.await.map_err(|_| ActorError::NoResponse)
    }
}
