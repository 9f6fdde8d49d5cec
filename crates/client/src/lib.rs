// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod chain;
mod clear_value;
mod client;
mod encrypted_input;
mod error;
mod share;
mod wire;

pub use chain::*;
pub use clear_value::*;
pub use client::*;
pub use encrypted_input::*;
pub use error::*;
pub use share::*;
pub use wire::*;
