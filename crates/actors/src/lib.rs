use std::panic::AssertUnwindSafe;

use actor::{Actor, SupervisionStrategy};
use actor_ref::ActorRef;
use futures::FutureExt;
use mailbox::{mailbox, DEFAULT_CAPACITY};

pub mod actor;
pub mod actor_ref;
pub mod frames;
pub mod handler;
pub mod mailbox;

/// Runs an actor on its own task with the default mailbox capacity. If a
/// handler panics, `Actor::on_fail()` decides whether the actor resumes with
/// its current state or stops.
pub fn spawn<A: Actor>(actor: A) -> ActorRef<A> {
    spawn_with_capacity(DEFAULT_CAPACITY, actor)
}

pub fn spawn_with_capacity<A: Actor>(capacity: usize, mut actor: A) -> ActorRef<A> {
    let (tx, mut rx) = mailbox(capacity);
    let actor_ref = ActorRef::new(tx);

    tokio::spawn(async move {
        while let Some(envelope) = rx.recv().await {
            let result = AssertUnwindSafe(envelope.deliver(&mut actor))
                .catch_unwind()
                .await;
            if let Err(why) = result {
                log::error!("actor panicked: {:?}", why);
                match actor.on_fail(why) {
                    SupervisionStrategy::Resume => {}
                    SupervisionStrategy::Stop => break,
                }
            }
        }
        log::debug!("actor stopped");
    });

    actor_ref
}

#[cfg(test)]
mod tests {
    use std::any::Any;

    use async_trait::async_trait;

    use super::*;
    use crate::{
        actor::ActorError,
        handler::{Handler, Message},
    };

    struct Counter {
        count: i64,
        strategy: SupervisionStrategy,
    }

    impl Counter {
        fn new(count: i64, strategy: SupervisionStrategy) -> Self {
            Self { count, strategy }
        }
    }

    impl Actor for Counter {
        fn on_fail(&mut self, _: Box<dyn Any + Send>) -> SupervisionStrategy {
            self.strategy
        }
    }

    struct Add(i64);

    impl Message for Add {
        type Response = ();
    }

    struct Get;

    impl Message for Get {
        type Response = i64;
    }

    struct Explode;

    impl Message for Explode {
        type Response = ();
    }

    #[async_trait]
    impl Handler<Add> for Counter {
        async fn handle(&mut self, message: Add) {
            self.count += message.0;
        }
    }

    #[async_trait]
    impl Handler<Get> for Counter {
        async fn handle(&mut self, _: Get) -> i64 {
            self.count
        }
    }

    #[async_trait]
    impl Handler<Explode> for Counter {
        async fn handle(&mut self, _: Explode) {
            panic!("boom");
        }
    }

    #[tokio::test]
    async fn handles_messages_in_order() {
        let counter = spawn(Counter::new(0, SupervisionStrategy::Resume));
        counter.try_tell(Add(1)).unwrap();
        counter.try_tell(Add(5)).unwrap();
        counter.try_tell(Add(-2)).unwrap();
        assert_eq!(counter.ask(Get).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn resumes_with_current_state_after_panic() {
        let counter = spawn(Counter::new(10, SupervisionStrategy::Resume));
        counter.ask(Add(5)).await.unwrap();
        assert_eq!(counter.ask(Explode).await, Err(ActorError::NoResponse));
        assert_eq!(counter.ask(Get).await.unwrap(), 15);
    }

    #[tokio::test]
    async fn stops_when_asked_to() {
        let counter = spawn(Counter::new(0, SupervisionStrategy::Stop));
        assert_eq!(counter.ask(Explode).await, Err(ActorError::NoResponse));
        assert_eq!(counter.ask(Get).await, Err(ActorError::Closed));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn try_tell_reports_full_mailbox() {
        // the actor task cannot run until this test yields
        let counter = spawn_with_capacity(1, Counter::new(0, SupervisionStrategy::Resume));
        assert_eq!(counter.try_tell(Add(1)), Ok(()));
        assert_eq!(counter.try_tell(Add(1)), Err(ActorError::Full));
        assert_eq!(counter.ask(Get).await.unwrap(), 1);
    }
}
