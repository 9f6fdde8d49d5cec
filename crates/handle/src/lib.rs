// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod derive;
mod error;
mod handle;
mod type_id;

pub use derive::*;
pub use error::*;
pub use handle::*;
pub use type_id::*;
