//! London transit zone lookup by postcode prefix.
//!
//! Display metadata only: zones never influence filtering, scoring or
//! ordering.

use crate::types::Clinic;
use serde::{Deserialize, Serialize};
use std::fmt;

const ZONE_1: &[&str] = &[
  "W1", "W2", "WC1", "WC2", "EC1", "EC2", "EC3", "EC4", "SW1", "SW3", "SW5", "SW7", "SW10", "N1",
  "N7", "E1", "E2", "SE1", "SE11",
];

const ZONE_2: &[&str] = &[
  "W3", "W4", "W5", "W6", "W8", "W9", "W10", "W11", "W12", "W14", "SW2", "SW4", "SW6", "SW8",
  "SW9", "SW11", "SW12", "SW13", "SW14", "SW15", "SW16", "SW17", "SW18", "NW1", "NW2", "NW3",
  "NW5", "NW6", "NW8", "NW10", "N2", "N3", "N4", "N5", "N6", "N8", "N9", "N10", "N11", "N12",
  "N13", "N14", "N15", "N16", "N17", "N18", "N19", "N20", "N21", "N22", "E3", "E5", "E6", "E7",
  "E8", "E9", "E10", "E11", "E12", "E13", "E14", "E15", "E16", "E17", "E18", "SE2", "SE3", "SE4",
  "SE5", "SE6", "SE7", "SE8", "SE9", "SE10", "SE12", "SE13", "SE14", "SE15", "SE16", "SE17",
  "SE18", "SE19", "SE20", "SE21", "SE22", "SE23", "SE24", "SE25", "SE26", "SE27", "SE28",
];

const ZONE_3: &[&str] = &[
  "SW19", "SW20", "SW21", "SW22", "SW23", "SW24", "SW25", "SW26", "SW27", "SW28", "NW3", "NW4",
  "NW7", "NW9", "NW10", "NW11", "N22", "N23", "N24", "N25", "N26", "N27", "N28", "N29", "E19",
  "E20", "SE29", "SE30", "SE31", "SE32", "SE33", "SE34", "SE35", "SE36", "SE37", "SE38", "SE39",
  "SE40", "W13", "W15", "W16", "W17", "W18", "W19", "W20", "HA0", "HA1", "HA2", "HA3", "HA4",
  "HA5", "HA6", "HA7", "HA8", "HA9", "UB1", "UB2", "UB3", "UB4", "UB5", "UB6", "UB7", "UB8", "UB9",
  "UB10", "TW1", "TW2", "TW3", "TW4", "TW5", "TW6", "TW7", "TW8", "TW9", "TW10", "TW11", "TW12",
  "TW13", "TW14", "KT1", "KT2", "KT3", "KT4", "KT5", "KT6", "KT7", "KT8", "KT9", "KT10", "CR0",
  "CR2", "CR4", "CR5", "CR6", "CR7", "CR8", "CR9", "BR1", "BR2", "BR3", "BR4", "BR5", "BR6", "BR7",
  "BR8", "DA1", "DA2", "DA3", "DA4", "DA5", "DA6", "DA7", "DA8", "DA9", "DA10", "DA11", "DA12",
  "DA13", "DA14", "DA15", "DA16", "DA17", "DA18",
];

/// A London fare zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Zone {
  One,
  Two,
  Three,
}

impl Zone {
  /// Zones in lookup priority order, each with its prefix table.
  const TABLES: [(Zone, &'static [&'static str]); 3] =
    [(Zone::One, ZONE_1), (Zone::Two, ZONE_2), (Zone::Three, ZONE_3)];

  pub fn number(&self) -> u8 {
    match self {
      Zone::One => 1,
      Zone::Two => 2,
      Zone::Three => 3,
    }
  }

  /// The postcode prefixes that place a clinic in this zone.
  pub fn prefixes(&self) -> &'static [&'static str] {
    match self {
      Zone::One => ZONE_1,
      Zone::Two => ZONE_2,
      Zone::Three => ZONE_3,
    }
  }
}

impl fmt::Display for Zone {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Zone {}", self.number())
  }
}

/// Zone for a postcode.
///
/// The postcode is trimmed and upper-cased, then tested with plain
/// starts-with against Zone 1, Zone 2 and Zone 3 in that order; the first
/// table with a matching prefix wins. Because matching is by prefix, "SW11"
/// lands in Zone 1 through "SW1", and "NW3" lands in Zone 2 even though it
/// is also listed for Zone 3.
///
/// ```rust
/// use dentalsearch::zone::{zone_for_postcode, Zone};
///
/// assert_eq!(zone_for_postcode("w1c 1dh"), Some(Zone::One));
/// assert_eq!(zone_for_postcode("RM3 0AQ"), None);
/// ```
pub fn zone_for_postcode(postcode: &str) -> Option<Zone> {
  let postcode = postcode.trim().to_uppercase();
  if postcode.is_empty() {
    return None;
  }
  Zone::TABLES
    .iter()
    .find(|(_, prefixes)| prefixes.iter().any(|p| postcode.starts_with(p)))
    .map(|(zone, _)| *zone)
}

/// Zone for a clinic, from its postcode. `None` without a postcode or
/// outside zones 1 to 3.
pub fn zone_of(clinic: &Clinic) -> Option<Zone> {
  clinic.postcode.as_deref().and_then(zone_for_postcode)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_known_postcodes() {
    assert_eq!(zone_for_postcode("W1C 1DH"), Some(Zone::One));
    assert_eq!(zone_for_postcode("TW11 8HG"), Some(Zone::Three));
    assert_eq!(zone_for_postcode("RM3 0AQ"), None);
    assert_eq!(zone_for_postcode("NW1 7JR"), Some(Zone::Two));
  }

  #[test]
  fn test_earlier_zone_wins_on_overlap() {
    assert_eq!(zone_for_postcode("NW3 2QG"), Some(Zone::Two));
    assert_eq!(zone_for_postcode("SW11 1AA"), Some(Zone::One));
  }

  #[test]
  fn test_blank_and_missing() {
    assert_eq!(zone_for_postcode("   "), None);
    assert_eq!(zone_of(&Clinic::default()), None);
  }

  #[test]
  fn test_lookup_is_repeatable() {
    let clinic = Clinic {
      postcode: Some(" tw11 8hg ".to_string()),
      ..Default::default()
    };
    for _ in 0..3 {
      assert_eq!(zone_of(&clinic).map(|z| z.number()), Some(3));
    }
    assert_eq!(Zone::Three.to_string(), "Zone 3");
  }
}
