// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod contracts;
pub mod load_config;
mod relayer_config;
pub mod validation;

pub use contracts::*;
pub use load_config::load_config;
pub use relayer_config::*;
