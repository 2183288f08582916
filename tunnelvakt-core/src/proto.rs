//! Protocol numbers and well-known tunnel ports.
//!
//! IANA assigned numbers the ruleset matches on. Kept in one place so the
//! classifier, traffic source, and tests agree on the values.

/// TCP, IANA protocol 6.
pub const TCP: u8 = 6;
/// UDP, IANA protocol 17. The only port-bearing protocol the engine inspects.
pub const UDP: u8 = 17;
/// IPsec Encapsulating Security Payload.
pub const ESP: u8 = 50;
/// IPsec Authentication Header.
pub const AH: u8 = 51;

/// IKE key exchange (UDP).
pub const PORT_IKE: u16 = 500;
/// IPsec NAT-traversal encapsulation (UDP).
pub const PORT_NAT_T: u16 = 4500;
/// OpenVPN default port (UDP).
pub const PORT_OPENVPN: u16 = 1194;
