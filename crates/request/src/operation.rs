// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::RequestError;
use std::fmt;
use url::Url;

/// Relayer jobs a client can submit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelayerOperation {
    InputProof,
    PublicDecrypt,
    UserDecrypt,
    DelegatedUserDecrypt,
}

impl RelayerOperation {
    pub fn path(&self) -> &'static str {
        match self {
            RelayerOperation::InputProof => "v2/input-proof",
            RelayerOperation::PublicDecrypt => "v2/public-decrypt",
            RelayerOperation::UserDecrypt => "v2/user-decrypt",
            RelayerOperation::DelegatedUserDecrypt => "v2/delegated-user-decrypt",
        }
    }

    /// Submission url of this operation under `base`
    pub fn endpoint(&self, base: &Url) -> Result<Url, RequestError> {
        let mut base = base.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(self.path())
            .map_err(|e| RequestError::InvalidUrl(e.to_string()))
    }
}

impl fmt::Display for RelayerOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RelayerOperation::InputProof => "input_proof",
            RelayerOperation::PublicDecrypt => "public_decrypt",
            RelayerOperation::UserDecrypt => "user_decrypt",
            RelayerOperation::DelegatedUserDecrypt => "delegated_user_decrypt",
        };
        f.write_str(name)
    }
}
