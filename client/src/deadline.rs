// ParaTime Deposit
// Copyright (C) 2019 Monadic GmbH <radicle@monadic.xyz>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License version 3 as
// published by the Free Software Foundation.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::future::Future;
use std::time::{Duration, Instant};

use crate::error::BackendError;

/// Point in time after which no further backend requests are started.
///
/// One deadline bounds a whole run of operations. Every request runs with the time that is left.
/// A timeout too large to be represented as a point in time yields a deadline that never passes.
#[derive(Clone, Copy, Debug)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    pub fn after(timeout: Duration) -> Self {
        Deadline {
            at: Instant::now().checked_add(timeout),
        }
    }

    /// Time left until the deadline passes. Zero if it has passed, `None` if it never passes.
    pub fn remaining(&self) -> Option<Duration> {
        self.at
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    pub fn has_passed(&self) -> bool {
        self.remaining() == Some(Duration::from_secs(0))
    }

    /// Run `request` and fail with [BackendError::Timeout] if it does not finish before the
    /// deadline.
    pub async fn run<T>(
        &self,
        request: impl Future<Output = Result<T, BackendError>>,
    ) -> Result<T, BackendError> {
        match self.remaining() {
            None => request.await,
            Some(remaining) if remaining == Duration::from_secs(0) => Err(BackendError::Timeout),
            Some(remaining) => async_std::future::timeout(remaining, request)
                .await
                .unwrap_or(Err(BackendError::Timeout)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[async_std::test]
    async fn run_returns_result_in_time() {
        let deadline = Deadline::after(Duration::from_secs(10));
        let result = deadline.run(async { Ok(5) }).await;
        assert_eq!(result.ok(), Some(5));
    }

    #[async_std::test]
    async fn run_times_out() {
        let deadline = Deadline::after(Duration::from_millis(10));
        let result: Result<(), _> = deadline
            .run(async {
                async_std::task::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(BackendError::Timeout)));
    }

    #[async_std::test]
    async fn passed_deadline_does_not_start_request() {
        let started = AtomicBool::new(false);
        let deadline = Deadline::after(Duration::from_secs(0));
        let result = deadline
            .run(async {
                started.store(true, Ordering::SeqCst);
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(BackendError::Timeout)));
        assert!(!started.load(Ordering::SeqCst));
    }

    #[async_std::test]
    async fn unrepresentable_timeout_never_passes() {
        let deadline = Deadline::after(Duration::from_secs(u64::MAX));
        assert!(!deadline.has_passed());
        assert_eq!(deadline.remaining(), None);
        let result = deadline.run(async { Ok(7) }).await;
        assert_eq!(result.ok(), Some(7));
    }
}
