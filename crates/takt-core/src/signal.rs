// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The external "force resynchronization" signal.
//!
//! This is the only scheduler state another thread may touch. The owner
//! side ([`ResetSignal`]) lives inside the scheduler and consumes the flag
//! exactly once per processed tick; any number of [`ResetHandle`] clones
//! may raise it from other threads. Raising is idempotent until the next
//! consuming tick.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Owner side of the reset flag, held by the scheduler.
#[derive(Debug, Default)]
pub struct ResetSignal {
    flag: Arc<AtomicBool>,
}

impl ResetSignal {
    /// Creates a lowered signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a raiser handle sharing this signal's flag.
    pub fn handle(&self) -> ResetHandle {
        ResetHandle {
            flag: Arc::clone(&self.flag),
        }
    }

    /// Whether a reset has been requested and not yet consumed.
    pub fn is_raised(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Consumes the flag: returns whether it was raised and lowers it.
    ///
    /// AcqRel pairs with the Release store in [`ResetHandle::raise`].
    pub(crate) fn take(&self) -> bool {
        self.flag.swap(false, Ordering::AcqRel)
    }
}

/// Cloneable, thread-safe raiser for the reset flag.
#[derive(Debug, Clone)]
pub struct ResetHandle {
    flag: Arc<AtomicBool>,
}

impl ResetHandle {
    /// Requests a full resynchronization at the start of the next
    /// processed tick. Never blocks.
    pub fn raise(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Whether the request is still pending.
    pub fn is_raised(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}
