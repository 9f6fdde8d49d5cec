// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Pack and unpack the input proof handed to on-chain input verification.
//!
//! ```text
//! | n_handles: u8 | n_signatures: u8 | handles: n_handles * 32 | signatures: n_signatures * 65 | extra_data |
//! ```
//!
//! Anything after the signatures is extra data. Newer protocol versions append metadata there
//! so decoding must never fail because of trailing bytes.

mod codec;

pub use codec::*;
