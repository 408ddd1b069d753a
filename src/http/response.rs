//! Responses the proxy writes itself.
//!
//! The only reply the proxy ever produces is the CONNECT confirmation; every
//! other byte sent to the client comes from the origin.

const CONNECT_ESTABLISHED: &[u8] = b" 200 Connection Established\r\n\r\n";

/// Build the CONNECT confirmation, echoing the client's HTTP version token.
pub fn connect_established(version: &[u8]) -> Vec<u8> {
    let mut reply = Vec::with_capacity(version.len() + CONNECT_ESTABLISHED.len());
    reply.extend_from_slice(version);
    reply.extend_from_slice(CONNECT_ESTABLISHED);
    reply
}
