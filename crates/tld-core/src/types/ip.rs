use serde::{Deserialize, Serialize};

/// Organization name reported when an address has no covering ASN range
pub const UNKNOWN_ORG: &str = "Unknown";

/// Country reported when an address has no covering ASN range
pub const UNKNOWN_COUNTRY: &str = "None";

/// A nameserver address enriched with the routing data of its ASN range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpRecord {
    /// The address exactly as it appeared in the page data
    #[serde(rename = "ip")]
    pub address: String,

    /// Autonomous system number (0 for "not routed" or unknown)
    pub asn: u32,

    /// AS organization name
    #[serde(rename = "as_org")]
    pub org_name: String,

    /// AS registration country
    #[serde(rename = "as_country")]
    pub country: String,
}

impl IpRecord {
    /// Create a record from a resolved ASN range
    #[must_use]
    pub fn new(
        address: impl Into<String>,
        asn: u32,
        org_name: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            asn,
            org_name: org_name.into(),
            country: country.into(),
        }
    }

    /// Create the sentinel record for an address no range covers
    #[must_use]
    pub fn unknown(address: impl Into<String>) -> Self {
        Self::new(address, 0, UNKNOWN_ORG, UNKNOWN_COUNTRY)
    }

    /// Returns true if this is the lookup-miss sentinel
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.asn == 0 && self.org_name == UNKNOWN_ORG && self.country == UNKNOWN_COUNTRY
    }
}

/// A nameserver with its enriched IPv4 and IPv6 addresses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nameserver {
    /// Nameserver host name
    pub hostname: String,

    /// IPv4 addresses
    #[serde(default)]
    pub ipv4: Vec<IpRecord>,

    /// IPv6 addresses
    #[serde(default)]
    pub ipv6: Vec<IpRecord>,
}

impl Nameserver {
    /// Iterate over all addresses, IPv4 first
    pub fn addresses(&self) -> impl Iterator<Item = &IpRecord> {
        self.ipv4.iter().chain(self.ipv6.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_sentinel() {
        let ip = IpRecord::unknown("192.0.2.1");
        assert_eq!(ip.asn, 0);
        assert_eq!(ip.org_name, "Unknown");
        assert_eq!(ip.country, "None");
        assert!(ip.is_unknown());
    }

    #[test]
    fn test_not_routed_is_not_unknown() {
        let ip = IpRecord::new("1.0.1.200", 0, "Not routed", "None");
        assert!(!ip.is_unknown());
    }

    #[test]
    fn test_serialized_field_names() {
        let ip = IpRecord::new("1.0.0.1", 13335, "CLOUDFLARENET", "US");
        let json = serde_json::to_value(&ip).unwrap();
        assert_eq!(json["ip"], "1.0.0.1");
        assert_eq!(json["asn"], 13335);
        assert_eq!(json["as_org"], "CLOUDFLARENET");
        assert_eq!(json["as_country"], "US");
    }
}
