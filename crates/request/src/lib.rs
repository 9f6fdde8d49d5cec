// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod abort;
mod error;
mod operation;
mod options;
mod request;
mod transport;
mod wire;

pub use abort::*;
pub use error::*;
pub use operation::*;
pub use options::*;
pub use request::*;
pub use transport::*;
pub use wire::*;
