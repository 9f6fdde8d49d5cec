// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::Address;
use anyhow::{anyhow, bail, Context, Result};
use url::Url;

pub fn checksummed_address(field: &str, value: &str) -> Result<Address> {
    if value.is_empty() {
        bail!("{field} is not set");
    }
    Address::parse_checksummed(value, None)
        .with_context(|| format!("{field} must be an EIP-55 checksummed address, got '{value}'"))
}

pub fn http_url(field: &str, value: &str) -> Result<Url> {
    let url = Url::parse(value).with_context(|| format!("{field} is not a valid url: '{value}'"))?;
    match url.scheme() {
        "http" | "https" if !url.cannot_be_a_base() => Ok(url),
        scheme => Err(anyhow!("{field} must be an http(s) url, got scheme '{scheme}'")),
    }
}
