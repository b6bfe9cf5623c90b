//
// Copyright (c) The FRR-MAD Contributors
//
// SPDX-License-Identifier: MIT
//

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio::{task, time};
use tracing::Instrument;

/// A handle to a task created by [`Task::spawn`].
///
/// Dropping the handle cancels the task, unless [`Task::detach`] was called.
#[derive(Debug)]
pub struct Task<T> {
    join_handle: task::JoinHandle<T>,
    detached: bool,
}

/// A handle to a poll loop created by [`IntervalTask::new`].
///
/// Dropping the handle stops the poll loop.
#[derive(Debug)]
pub struct IntervalTask {
    _task: Task<()>,
}

// ===== impl Task =====

impl<T> Task<T> {
    /// Spawns a new asynchronous task, returning a handle for it.
    pub fn spawn<Fut>(future: Fut) -> Task<T>
    where
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        Task {
            join_handle: task::spawn(future),
            detached: false,
        }
    }

    /// Detaches the task, so that dropping its handle no longer cancels it.
    pub fn detach(&mut self) {
        self.detached = true;
    }
}

impl<T> Future for Task<T> {
    type Output = Result<T, task::JoinError>;

    fn poll(
        mut self: Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Self::Output> {
        Pin::new(&mut self.join_handle).poll(cx)
    }
}

impl<T> Drop for Task<T> {
    fn drop(&mut self) {
        if !self.detached {
            self.join_handle.abort();
        }
    }
}

// ===== impl IntervalTask =====

impl IntervalTask {
    /// Spawns a poll loop that calls the provided async closure every time
    /// the interval timer ticks.
    ///
    /// A tick that is missed because the previous callback ran for too long
    /// is delayed rather than fired in a burst, so slow fetches from the
    /// routing daemon never pile up.
    pub fn new<F, Fut>(
        interval: Duration,
        tick_on_start: bool,
        mut cb: F,
    ) -> IntervalTask
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let task = Task::spawn(
            async move {
                let mut ticker = new_ticker(interval, tick_on_start);
                loop {
                    ticker.tick().await;
                    (cb)().await;
                }
            }
            .in_current_span(),
        );

        IntervalTask { _task: task }
    }
}

// ===== helper functions =====

fn new_ticker(interval: Duration, tick_on_start: bool) -> time::Interval {
    let mut ticker = if tick_on_start {
        time::interval(interval)
    } else {
        time::interval_at(time::Instant::now() + interval, interval)
    };
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

// ===== unit tests =====
