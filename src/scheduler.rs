// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Worker pool handle for immediate and deferred tasks.

use std::future::Future;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::error::{Error, Result};

/// Submits work to the tokio runtime that backs a controller.
///
/// Two primitives are offered: [`execute`](Self::execute) runs a task as
/// soon as a worker is free, and [`schedule`](Self::schedule) runs it no
/// earlier than a given delay from now. Tasks never run on the caller's
/// stack.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use zeptrion_lib::Scheduler;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> zeptrion_lib::Result<()> {
/// let scheduler = Scheduler::try_current()?;
/// let handle = scheduler.schedule(Duration::from_millis(10), async { 42 });
/// assert_eq!(handle.await.unwrap(), 42);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Scheduler {
    handle: Handle,
}

impl Scheduler {
    /// Creates a scheduler on the given runtime.
    #[must_use]
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Creates a scheduler on the runtime of the calling context.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfiguration` when called outside a tokio
    /// runtime.
    pub fn try_current() -> Result<Self> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|e| Error::InvalidConfiguration(format!("no tokio runtime available: {e}")))
    }

    /// Runs a task on the worker pool now.
    pub fn execute<F>(&self, task: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.handle.spawn(task)
    }

    /// Runs a task on the worker pool after `delay` has elapsed.
    pub fn schedule<F>(&self, delay: Duration, task: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            task.await
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;

    #[test]
    fn try_current_outside_runtime_fails() {
        let result = Scheduler::try_current();
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
    }

    #[tokio::test]
    async fn execute_runs_task() {
        let scheduler = Scheduler::try_current().unwrap();
        assert_eq!(scheduler.execute(async { 7 }).await.unwrap(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn schedule_waits_for_delay() {
        let scheduler = Scheduler::try_current().unwrap();
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);

        let handle = scheduler.schedule(Duration::from_millis(500), async move {
            flag.store(true, Ordering::SeqCst);
        });

        tokio::time::advance(Duration::from_millis(499)).await;
        tokio::task::yield_now().await;
        assert!(!ran.load(Ordering::SeqCst));

        handle.await.unwrap();
        assert!(ran.load(Ordering::SeqCst));
    }
}
