// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod logging;
mod mock_transport;
mod relayer_bodies;
mod signers;

pub use logging::*;
pub use mock_transport::*;
pub use relayer_bodies::*;
pub use signers::*;
