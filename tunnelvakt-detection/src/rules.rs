//! ## tunnelvakt-detection::rules
//! **Static tunnel-signature ruleset over header metadata**
//!
//! Rules are evaluated in a fixed order and the first match wins; the order
//! only affects which rule id is reported, since any match blocks. Port rules
//! apply to UDP only — a packet without parsed ports is a non-match, never an
//! error (fail-open on malformed transport headers, fail-closed only on
//! unambiguous protocol and port matches).

use tunnelvakt_config::EnforcementConfig;
use tunnelvakt_core::proto;
use tunnelvakt_core::Packet;

/// Identifier of the rule that matched, for audit and debug output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rule {
    /// ESP (50) or AH (51) protocol number.
    IpsecProtocol,
    /// IKE (UDP 500) or NAT-T (UDP 4500) on either side of the flow.
    IpsecPort,
    /// OpenVPN (UDP 1194) on either side of the flow.
    OpenVpnPort,
}

impl Rule {
    pub fn name(&self) -> &'static str {
        match self {
            Rule::IpsecProtocol => "ipsec-protocol",
            Rule::IpsecPort => "ipsec-port",
            Rule::OpenVpnPort => "openvpn-port",
        }
    }
}

/// Classification result: the block/forward decision plus the matched rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Verdict {
    pub is_vpn: bool,
    pub rule: Option<Rule>,
}

impl Verdict {
    const CLEAN: Verdict = Verdict {
        is_vpn: false,
        rule: None,
    };

    fn matched(rule: Rule) -> Self {
        Self {
            is_vpn: true,
            rule: Some(rule),
        }
    }
}

/// Classifies one packet against the active policy.
///
/// Pure and deterministic: identical inputs always yield identical verdicts.
pub fn classify(packet: &Packet, policy: &EnforcementConfig) -> Verdict {
    if policy.block_ipsec && matches!(packet.protocol, proto::ESP | proto::AH) {
        return Verdict::matched(Rule::IpsecProtocol);
    }

    // Port heuristics only apply to port-bearing transports.
    if packet.protocol == proto::UDP {
        if let Some(ports) = packet.ports {
            if policy.block_ipsec
                && (ports.either(proto::PORT_IKE) || ports.either(proto::PORT_NAT_T))
            {
                return Verdict::matched(Rule::IpsecPort);
            }
            if policy.block_openvpn && ports.either(proto::PORT_OPENVPN) {
                return Verdict::matched(Rule::OpenVpnPort);
            }
        }
    }

    Verdict::CLEAN
}
