//! IP-to-ASN lookup over the iptoasn range table.
//!
//! Ranges are split by address family, sorted by start address, and searched
//! with a binary search over a parallel array of integer start values.

use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::path::Path;
use tld_core::{Result, TldError};
use tracing::{debug, info, warn};

/// One row of the range table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeEntry {
    /// First address of the range (inclusive)
    pub start_address: String,
    /// Last address of the range (inclusive)
    pub end_address: String,
    /// Autonomous system number; 0 marks "not routed"
    pub asn: u32,
    /// Registration country code
    pub country: String,
    /// AS organization name
    pub org_name: String,
}

impl RangeEntry {
    /// Create an entry
    #[must_use]
    pub fn new(
        start_address: impl Into<String>,
        end_address: impl Into<String>,
        asn: u32,
        country: impl Into<String>,
        org_name: impl Into<String>,
    ) -> Self {
        Self {
            start_address: start_address.into(),
            end_address: end_address.into(),
            asn,
            country: country.into(),
            org_name: org_name.into(),
        }
    }

    /// Returns true if the table marks this range as not routed
    #[must_use]
    pub const fn is_not_routed(&self) -> bool {
        self.asn == 0
    }
}

/// Sorted ranges of a single address family
#[derive(Debug, Clone)]
struct FamilyIndex<K> {
    starts: Vec<K>,
    ends: Vec<K>,
    entries: Vec<RangeEntry>,
}

impl<K: Ord + Copy> FamilyIndex<K> {
    fn from_ranges(mut ranges: Vec<(K, K, RangeEntry)>) -> Self {
        ranges.sort_by_key(|(start, _, _)| *start);

        let mut index = Self {
            starts: Vec::with_capacity(ranges.len()),
            ends: Vec::with_capacity(ranges.len()),
            entries: Vec::with_capacity(ranges.len()),
        };
        for (start, end, entry) in ranges {
            index.starts.push(start);
            index.ends.push(end);
            index.entries.push(entry);
        }
        index
    }

    /// Rightmost range whose start is <= `ip`, if it also ends at or after `ip`
    fn find(&self, ip: K) -> Option<&RangeEntry> {
        let idx = self.starts.partition_point(|start| *start <= ip);
        let candidate = idx.checked_sub(1)?;
        (ip <= self.ends[candidate]).then(|| &self.entries[candidate])
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Address family of a table row or query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    V4,
    V6,
}

impl Family {
    /// IPv6 addresses are the ones containing a colon
    #[must_use]
    pub fn of(address: &str) -> Self {
        if address.contains(':') {
            Self::V6
        } else {
            Self::V4
        }
    }
}

/// Read-only IP range index, one sorted table per address family.
///
/// Built once per run; `lookup` never mutates, so the index can be shared
/// freely between readers.
#[derive(Debug, Clone)]
pub struct RangeIndex {
    v4: FamilyIndex<u32>,
    v6: FamilyIndex<u128>,
}

impl RangeIndex {
    /// Build an index from table rows.
    ///
    /// Rows whose addresses do not parse in their family, or whose end
    /// precedes their start, are skipped and logged.
    #[must_use]
    pub fn build(entries: Vec<RangeEntry>) -> Self {
        let mut v4 = Vec::new();
        let mut v6 = Vec::new();
        let mut skipped = 0usize;

        for entry in entries {
            match Family::of(&entry.start_address) {
                Family::V4 => match parse_v4_bounds(&entry) {
                    Some((start, end)) => v4.push((start, end, entry)),
                    None => skipped += 1,
                },
                Family::V6 => match parse_v6_bounds(&entry) {
                    Some((start, end)) => v6.push((start, end, entry)),
                    None => skipped += 1,
                },
            }
        }

        if skipped > 0 {
            warn!(skipped, "Skipped malformed ASN ranges");
        }

        let index = Self {
            v4: FamilyIndex::from_ranges(v4),
            v6: FamilyIndex::from_ranges(v6),
        };
        debug!(ipv4 = index.v4.len(), ipv6 = index.v6.len(), "Built ASN range index");
        index
    }

    /// Find the range covering `address`.
    ///
    /// Malformed input, including surrounding whitespace, yields `None`. A
    /// range with ASN 0 is a match like any other.
    #[must_use]
    pub fn lookup(&self, address: &str) -> Option<&RangeEntry> {
        match address.parse::<IpAddr>() {
            Ok(ip) => self.lookup_addr(ip),
            Err(_) => None,
        }
    }

    /// Find the range covering an already parsed address
    #[must_use]
    pub fn lookup_addr(&self, ip: IpAddr) -> Option<&RangeEntry> {
        match ip {
            IpAddr::V4(v4) => self.v4.find(u32::from(v4)),
            IpAddr::V6(v6) => self.v6.find(u128::from(v6)),
        }
    }

    /// Number of indexed ranges across both families
    #[must_use]
    pub fn len(&self) -> usize {
        self.v4.len() + self.v6.len()
    }

    /// Returns true if no range was indexed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn parse_v4_bounds(entry: &RangeEntry) -> Option<(u32, u32)> {
    let start = entry.start_address.parse::<Ipv4Addr>().ok()?;
    let end = entry.end_address.parse::<Ipv4Addr>().ok()?;
    let (start, end) = (u32::from(start), u32::from(end));
    if end < start {
        debug!(start = %entry.start_address, end = %entry.end_address, "Inverted IPv4 range");
        return None;
    }
    Some((start, end))
}

fn parse_v6_bounds(entry: &RangeEntry) -> Option<(u128, u128)> {
    let start = entry.start_address.parse::<Ipv6Addr>().ok()?;
    let end = entry.end_address.parse::<Ipv6Addr>().ok()?;
    let (start, end) = (u128::from(start), u128::from(end));
    if end < start {
        debug!(start = %entry.start_address, end = %entry.end_address, "Inverted IPv6 range");
        return None;
    }
    Some((start, end))
}

/// Parse one TSV row: `start<TAB>end<TAB>asn<TAB>country<TAB>org...`.
///
/// The org is the remainder of the line and may itself contain tabs.
#[must_use]
pub fn parse_row(line: &str) -> Option<RangeEntry> {
    let mut fields = line.splitn(5, '\t');
    let start = fields.next()?;
    let end = fields.next()?;
    let asn = fields.next()?.trim().parse::<u32>().ok()?;
    let country = fields.next()?;
    let org = fields.next()?;
    Some(RangeEntry::new(start, end, asn, country, org))
}

/// Parse an iptoasn table from a reader, skipping blank and malformed rows
pub fn parse_asn_table<R: BufRead>(reader: R) -> Result<Vec<RangeEntry>> {
    let mut entries = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| TldError::io("<asn table>", e))?;
        let line = line.trim_matches(|c: char| c == '\r' || c == '\n' || c == ' ');
        if line.is_empty() {
            continue;
        }
        match parse_row(line) {
            Some(entry) => entries.push(entry),
            None => debug!(line = idx + 1, "Skipping malformed ASN table row"),
        }
    }

    Ok(entries)
}

/// Read an iptoasn table from disk; `.gz` files are decompressed on the fly
pub fn read_asn_table(path: &Path) -> Result<Vec<RangeEntry>> {
    let file = File::open(path).map_err(|e| TldError::io(path, e))?;
    let reader: Box<dyn Read> = if path.extension().is_some_and(|ext| ext == "gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    let entries = parse_asn_table(BufReader::new(reader)).map_err(|e| match e {
        TldError::Io { source, .. } => TldError::io(path, source),
        other => other,
    })?;
    info!(path = %path.display(), count = entries.len(), "Loaded ASN table");
    Ok(entries)
}
