// Copyright 2025 0xjcf
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
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg_attr(not(any(feature = "std", test)), no_std)]

//! # Rulechart
//! A compact hierarchical state machine driven entirely by a rule table.
//! States, superstates, entry/exit actions and event responses are plain data
//! in a fixed-capacity, sorted store; no per-state code is generated and no
//! allocation happens after construction.

pub mod core;

pub use crate::core::{
    Action, ActionFn, ConfigError, Edge, EdgeKind, Engine, EnterExitFn, Label, MAX_CHAIN_DEPTH,
    Model, Names, RuleTag, SendResult,
};

pub mod prelude {
    pub use crate::StateMachine;
    pub use crate::action;
    pub use crate::core::{Engine, Model, SendResult};
}

/// Uniform view over anything that consumes events and exposes one current state.
pub trait StateMachine {
    type State: Copy + Clone + PartialEq + ::core::fmt::Debug;
    type Event: Copy + Clone + PartialEq + ::core::fmt::Debug;
    type Context;

    fn send(&mut self, event: Self::Event) -> bool;
    fn state(&self) -> Self::State;
    fn context(&self) -> &Self::Context;
    fn context_mut(&mut self) -> &mut Self::Context;
}
