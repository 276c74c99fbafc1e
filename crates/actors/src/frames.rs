//! A periodic frame signal for an actor, the event loop's equivalent of a
//! display refresh callback.

use std::time::{Duration, Instant};

use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{
    actor::{Actor, ActorError},
    actor_ref::ActorRef,
    handler::{Handler, Message},
};

pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Sends one message per tick until stopped, dropped, or the actor is gone.
///
/// Frames are offered with `try_tell`: when the actor is still busy with
/// earlier work the frame is skipped instead of queued, so a slow handler
/// never builds a backlog of stale frames.
pub struct FrameTicker {
    token: CancellationToken,
}

impl FrameTicker {
    pub fn spawn<A, M, F>(actor: ActorRef<A>, interval: Duration, make_message: F) -> Self
    where
        A: Actor + Handler<M>,
        M: Message,
        F: Fn(Instant) -> M + Send + 'static,
    {
        let token = CancellationToken::new();
        let cancelled = token.clone();

        tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    tick = ticker.tick() => {
                        match actor.try_tell(make_message(tick.into_std())) {
                            Ok(()) => {}
                            Err(ActorError::Full) => log::trace!("frame dropped, actor busy"),
                            Err(why) => {
                                log::debug!("frame ticker stopping: {}", why);
                                break;
                            }
                        }
                    }
                }
            }
        });

        Self { token }
    }

    pub fn stop(&self) {
        self.token.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for FrameTicker {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
