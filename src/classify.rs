//! Topical classification of article text.
//!
//! The classifier assigns one [`Category`] and a map-visibility flag per
//! article. Conflict-keyword detection runs first (any conflict text is
//! `wars` and map-worthy, with the conflict's fixed location); otherwise
//! an ordered list of keyword buckets is evaluated with first-match-wins
//! semantics, so the buckets are mutually exclusive by evaluation order:
//! wars > economy > disaster > science-tech > planet-people >
//! culture-curiosities > world-politics (default).
//!
//! Matching is plain case-insensitive substring containment. Two numeric
//! heuristics supplement the keyword gates: a casualty-count pattern
//! forces map visibility for any category, and a large dollar amount does
//! so for economy stories.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::geo::{self, GeoMatch};
use crate::models::{Category, Importance};

/// Classification outcome for one piece of text.
///
/// `location` is populated only when a named conflict matched; it then
/// supersedes whatever the generic location detector found.
/// `keyword_match` is false when the text hit no conflict and no bucket,
/// so the category is only the world-politics default; callers with an
/// editorial hint for the source may substitute it in that case.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub category: Category,
    pub show_on_map: bool,
    pub location: Option<GeoMatch>,
    pub keyword_match: bool,
}

/// When a bucket match is map-worthy.
enum MapGate {
    /// Every article in this bucket renders on the map.
    Always,
    /// Only when one of these sub-keywords also appears.
    AnyOf(&'static [&'static str]),
}

struct Bucket {
    category: Category,
    keywords: &'static [&'static str],
    gate: MapGate,
}

/// Ordered category buckets. Bare "war" is deliberately absent from the
/// wars keywords: "trade war" must fall through to the economy bucket.
static BUCKETS: &[Bucket] = &[
    Bucket {
        category: Category::Wars,
        keywords: &[
            "military",
            "troops",
            "invasion",
            "missile",
            "airstrike",
            "offensive",
            "ceasefire",
            "artillery",
            "shelling",
            "frontline",
            "battlefield",
            "insurgent",
            "warplane",
            "nato",
        ],
        gate: MapGate::Always,
    },
    Bucket {
        category: Category::Economy,
        keywords: &[
            "economy",
            "economic",
            "inflation",
            "interest rate",
            "stock market",
            "central bank",
            "recession",
            "currency",
            "unemployment",
            "tariff",
            "trade war",
            "gdp",
            "market",
        ],
        gate: MapGate::AnyOf(&["market crash", "recession", "trade war", "inflation crisis"]),
    },
    Bucket {
        category: Category::Disaster,
        keywords: &[
            "earthquake",
            "flood",
            "hurricane",
            "wildfire",
            "tsunami",
            "eruption",
            "volcano",
            "landslide",
            "drought",
            "typhoon",
            "cyclone",
            "tornado",
            "famine",
        ],
        gate: MapGate::Always,
    },
    Bucket {
        category: Category::ScienceTech,
        keywords: &[
            "science",
            "technology",
            "research",
            "spacex",
            "nasa",
            "artificial intelligence",
            "quantum",
            "vaccine",
            "satellite",
            "rocket",
        ],
        gate: MapGate::AnyOf(&["breakthrough", "discovery", "historic", "launch"]),
    },
    Bucket {
        category: Category::PlanetPeople,
        keywords: &[
            "climate",
            "environment",
            "refugee",
            "humanitarian",
            "biodiversity",
            "pollution",
            "migration",
            "human rights",
            "wildlife",
        ],
        gate: MapGate::AnyOf(&["crisis", "emergency", "historic", "catastrophic"]),
    },
    Bucket {
        category: Category::CultureCuriosities,
        keywords: &[
            "culture",
            "cultural",
            "museum",
            "festival",
            "music",
            "film",
            "heritage",
            "archaeolog",
            "exhibition",
        ],
        gate: MapGate::AnyOf(&["historic", "unprecedented"]),
    },
];

/// Map gate for the default world-politics bucket.
static POLITICS_GATE: &[&str] = &[
    "president",
    "election",
    "summit",
    "treaty",
    "diplomatic crisis",
    "protest",
];

static CASUALTY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b\d[\d,]*\s+(?:dead|killed|injured|casualt|missing)").unwrap()
});

static MONEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\$\s?\d[\d,.]*\s*(?:million|billion|trillion)").unwrap());

static HIGH_IMPORTANCE: &[&str] = &[
    "crisis", "urgent", "breaking", "major", "critical", "emergency", "dramatic", "severe",
];

static MEDIUM_IMPORTANCE: &[&str] = &["important", "significant", "develops", "update", "new"];

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// Classify text into a category and map-visibility flag.
pub fn classify(text: &str) -> Classification {
    let lower = text.to_lowercase();

    // Conflict detection takes precedence over every keyword bucket.
    if let Some(zone) = geo::conflict_match(&lower) {
        return Classification {
            category: Category::Wars,
            show_on_map: true,
            location: Some(GeoMatch::from_conflict(zone)),
            keyword_match: true,
        };
    }

    let matched = BUCKETS
        .iter()
        .find(|bucket| contains_any(&lower, bucket.keywords));
    let (category, gated, keyword_match) = match matched {
        Some(bucket) => {
            let show = match bucket.gate {
                MapGate::Always => true,
                MapGate::AnyOf(subs) => contains_any(&lower, subs),
            };
            (bucket.category, show, true)
        }
        None => (
            Category::WorldPolitics,
            contains_any(&lower, POLITICS_GATE),
            false,
        ),
    };

    let mut show_on_map = gated;
    if CASUALTY_RE.is_match(&lower) {
        show_on_map = true;
    }
    if category == Category::Economy && MONEY_RE.is_match(&lower) {
        show_on_map = true;
    }

    Classification {
        category,
        show_on_map,
        location: None,
        keyword_match,
    }
}

/// Compute the display-hint importance from the ordered keyword ladders.
pub fn importance(text: &str) -> Importance {
    let lower = text.to_lowercase();
    if contains_any(&lower, HIGH_IMPORTANCE) {
        Importance::High
    } else if contains_any(&lower, MEDIUM_IMPORTANCE) {
        Importance::Medium
    } else {
        Importance::Low
    }
}

/// Legacy coarse label set kept for callers of [`detect_news_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum NewsType {
    Economy,
    Conflict,
    Politics,
    Disaster,
    Social,
}

/// Older five-label classifier, now a thin mapping over [`classify`].
#[deprecated(note = "use classify(); this only remaps onto the legacy label set")]
#[allow(dead_code)]
pub fn detect_news_type(text: &str) -> NewsType {
    match classify(text).category {
        Category::Economy => NewsType::Economy,
        Category::Wars => NewsType::Conflict,
        Category::Disaster => NewsType::Disaster,
        Category::PlanetPeople | Category::CultureCuriosities => NewsType::Social,
        Category::WorldPolitics | Category::ScienceTech => NewsType::Politics,
    }
}
