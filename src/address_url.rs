//! The address-URL mini-format (spec.md §4.4, §9): a stable wire contract
//! embedding a guest pointer inside a JSON descriptor string. Treated as its
//! own encode/decode pair rather than ad-hoc string formatting, per the
//! spec's design notes.

use crate::error::PipelineError;

const PREFIX: &str = "data:application/vnd.itk.address,0:";

/// Encode a guest pointer as `data:application/vnd.itk.address,0:<ptr>`.
///
/// The `run` component is always 0 in this version (spec.md §6), so the
/// literal `0:` prefix is baked in rather than parameterized.
pub fn encode(ptr: u32) -> String {
    format!("{PREFIX}{ptr}")
}

/// Parse an address-URL back into a guest pointer.
pub fn decode(url: &str) -> Result<u32, PipelineError> {
    url.strip_prefix(PREFIX)
        .and_then(|rest| rest.parse::<u32>().ok())
        .ok_or_else(|| PipelineError::MalformedAddressUrl(url.to_string()))
}
