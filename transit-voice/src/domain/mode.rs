//! Transport mode classification.
//!
//! Providers label vehicles with a zoo of category codes ("IC", "T", "NFB",
//! "express_train", ...). Everything downstream works with the small set of
//! canonical [`Mode`]s instead.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical transport mode.
///
/// Unknown provider codes classify as [`Mode::Unknown`]; the raw code is kept
/// alongside on the departure so it can still be spoken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Bus,
    Tram,
    Train,
    Boat,
    Walk,
    Unknown,
}

impl Mode {
    /// Every mode, in catalog order.
    pub const ALL: [Mode; 6] = [
        Mode::Bus,
        Mode::Tram,
        Mode::Train,
        Mode::Boat,
        Mode::Walk,
        Mode::Unknown,
    ];

    /// Lowercase canonical name.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Bus => "bus",
            Mode::Tram => "tram",
            Mode::Train => "train",
            Mode::Boat => "boat",
            Mode::Walk => "walk",
            Mode::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Map a provider category code to a canonical mode.
///
/// Matching is case-insensitive and ignores surrounding whitespace. Codes
/// that are not recognised map to [`Mode::Unknown`]; this never fails.
///
/// # Examples
///
/// ```
/// use transit_voice::domain::{Mode, classify};
///
/// assert_eq!(classify("BUS"), Mode::Bus);
/// assert_eq!(classify("T"), Mode::Tram);
/// assert_eq!(classify("IR"), Mode::Train);
/// assert_eq!(classify("express_train"), Mode::Train);
/// assert_eq!(classify("cableway"), Mode::Unknown);
/// ```
pub fn classify(code: &str) -> Mode {
    match code.trim().to_ascii_lowercase().as_str() {
        "bus" | "b" | "nfb" | "nfo" | "ext" => Mode::Bus,
        "t" | "tram" | "nft" | "tramway_underground" => Mode::Tram,
        "ic" | "ir" | "s" | "sn" | "r" | "re" | "ice" | "ec" | "en" | "tgv" | "rj" | "rjx"
        | "icn" | "pe" | "strain" | "express_train" | "train" | "regional_train" => Mode::Train,
        "bat" | "bav" | "ship" | "boat" => Mode::Boat,
        "walk" => Mode::Walk,
        _ => Mode::Unknown,
    }
}

/// Build the spoken line name from a category code and a line number.
///
/// Buses and trams are known by their number alone ("the 7 tram"); other
/// categories carry their prefix ("IC5", "S7").
pub fn line_name(category: &str, number: &str) -> String {
    let category = category.trim();
    let number = number.trim();

    if number.is_empty() {
        return category.to_string();
    }

    match classify(category) {
        Mode::Bus | Mode::Tram => number.to_string(),
        _ if number.starts_with(category) => number.to_string(),
        _ => format!("{category}{number}"),
    }
}
