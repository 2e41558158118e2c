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

//! Typed event channel connecting the scheduler to decoupled consumers.
//!
//! The scheduler holds only a sender; hosts own the [`EventBus`] and drain
//! its receiver at their own pace. Publication never blocks the tick path.

mod bus;
mod scheduler_event;

pub use self::bus::EventBus;
pub use self::scheduler_event::SchedulerEvent;
