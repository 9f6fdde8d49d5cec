// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod eip712;
mod error;
mod messages;
mod signer_set;
mod verify;

pub use eip712::*;
pub use error::*;
pub use messages::*;
pub use signer_set::*;
pub use verify::*;
