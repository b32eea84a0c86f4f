//! Phrase lists used by the heuristic classifier.
//!
//! All entries are lower case; they are matched as substrings of the lowered input.

/// Weight added to the fake score for each high-signal phrase found.
pub const HIGH_WEIGHT: u32 = 3;
/// Weight added to the fake score for each medium-signal phrase found.
pub const MEDIUM_WEIGHT: u32 = 2;
/// Weight added to the real score for each credibility phrase found.
pub const CREDIBILITY_WEIGHT: u32 = 3;
/// Bonus for a dollar amount such as `$500`.
pub const DOLLAR_AMOUNT_WEIGHT: u32 = 2;
/// Bonus for shouting markers.
pub const URGENCY_WEIGHT: u32 = 1;

/// Weather conspiracies and get-rich-quick phrasing.
pub const HIGH_FAKE_SIGNALS: &[&str] = &[
    "weather modification",
    "chemtrails",
    "government creating storms",
    "climate weapon",
    "haarp",
    "geoengineering",
    "make $",
    "earn $",
    "$10000",
    "$10,000",
    "weekly income",
    "make money from home",
    "work from home",
    "financial freedom",
    "get rich",
    "become rich",
    "money fast",
    "easy money",
    "guaranteed income",
    "millionaire",
    "cash fast",
];

/// Clickbait and miracle-product phrasing.
pub const MEDIUM_FAKE_SIGNALS: &[&str] = &[
    "secret",
    "hidden truth",
    "they don't want you",
    "shocking",
    "does the work of",
    "replaces all",
    "one gadget that",
    "but stores won't sell",
    "banned by",
    "doctors hate this",
    "lose weight fast",
    "instant results",
    "miracle",
    "big companies hate",
    "never before seen",
    "revolutionary",
    "simple trick",
    "one weird trick",
    "passive income",
];

/// Sourcing language typical of reliable reporting.
pub const CREDIBILITY_SIGNALS: &[&str] = &[
    "according to official data",
    "research shows",
    "study found",
    "official source",
    "verified information",
    "peer-reviewed",
    "clinical trial",
    "reuters",
    "associated press",
    "bbc",
    "cnn",
    "study published in",
    "research from",
    "data from",
    "according to experts",
    "scientists say",
    "medical professionals",
];

/// Shouting markers, matched case-sensitively on the raw input.
pub const URGENCY_MARKERS: &[&str] = &["!!!", "URGENT!"];
