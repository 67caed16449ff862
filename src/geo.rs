//! Location detection from free text.
//!
//! Maps article text to a best-guess `{lat, lng, region}` through an
//! ordered cascade of keyword rules, first match wins:
//!
//! 1. Named-conflict zones (fixed editorial centroids)
//! 2. Mutual-exclusion pairs (generic country only when the conflict
//!    keywords are absent)
//! 3. Gazetteer lookup (~60 places, insertion order is the precedence)
//! 4. Southeast-Asia country fallbacks
//! 5. Economic-topic fallback to a regional financial center
//! 6. Continent-level fallback
//! 7. `(0, 0)` / "global" default
//!
//! Reordering the cascade changes the answer for ambiguous text, so the
//! stages below must stay in this sequence. The gazetteer is matched in
//! insertion order; broad names can shadow more specific ones that come
//! later, and that ordering is load-bearing (entries like "somalia" are
//! placed before substrings like "mali" on purpose).

use crate::models::Location;

/// Result of resolving text to a place.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoMatch {
    pub location: Location,
    pub region: String,
}

impl GeoMatch {
    fn named(lat: f64, lng: f64, name: &str, region: &str) -> Self {
        Self {
            location: Location::named(lat, lng, name),
            region: region.to_string(),
        }
    }

    /// The fixed point of a named conflict zone.
    pub fn from_conflict(zone: &ConflictZone) -> Self {
        Self::named(zone.lat, zone.lng, zone.name, zone.region)
    }

    /// The default when nothing matched.
    pub fn global() -> Self {
        Self {
            location: Location::global(),
            region: "global".to_string(),
        }
    }
}

/// A named conflict zone with a fixed, editorially chosen centroid.
///
/// Conflict zones resolve to a stable point even when the text also
/// mentions a more generic place name, so they are checked before any
/// gazetteer lookup.
#[derive(Debug)]
pub struct ConflictZone {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub lat: f64,
    pub lng: f64,
    pub region: &'static str,
}

/// The known conflict zones. Shared with the classifier (conflict text is
/// always `wars`) and the sample generator (one fixture per zone).
pub static CONFLICTS: &[ConflictZone] = &[
    ConflictZone {
        name: "Ukraine",
        keywords: &["ukraine", "kyiv", "kharkiv", "donbas", "crimea", "zelensky"],
        lat: 49.4871968,
        lng: 31.2718321,
        region: "eastern_europe",
    },
    ConflictZone {
        name: "Gaza",
        keywords: &["gaza", "palestin", "hamas", "rafah", "west bank"],
        lat: 31.5017,
        lng: 34.4668,
        region: "middle_east",
    },
    ConflictZone {
        name: "Sudan",
        keywords: &["sudan", "khartoum", "darfur"],
        lat: 15.5007,
        lng: 32.5599,
        region: "africa",
    },
    ConflictZone {
        name: "Syria",
        keywords: &["syria", "damascus", "aleppo"],
        lat: 33.5138,
        lng: 36.2765,
        region: "middle_east",
    },
    ConflictZone {
        name: "Myanmar",
        keywords: &["myanmar", "burma", "yangon"],
        lat: 19.7633,
        lng: 96.0785,
        region: "southeast_asia",
    },
];

/// A rule that fires only when its generic keywords appear AND none of
/// the more specific competing keywords do. Text mentioning both Russia
/// and Ukraine is about the Ukraine conflict, not Russia generically.
struct ExclusionRule {
    any: &'static [&'static str],
    none: &'static [&'static str],
    name: &'static str,
    lat: f64,
    lng: f64,
    region: &'static str,
}

static EXCLUSION_RULES: &[ExclusionRule] = &[
    ExclusionRule {
        any: &["russia", "moscow", "putin", "kremlin"],
        none: &["ukraine", "kyiv", "zelensky"],
        name: "Moscow",
        lat: 55.7558,
        lng: 37.6173,
        region: "eastern_europe",
    },
    ExclusionRule {
        any: &["israel", "tel aviv", "netanyahu"],
        none: &["gaza", "palestin", "hamas", "rafah"],
        name: "Jerusalem",
        lat: 31.7683,
        lng: 35.2137,
        region: "middle_east",
    },
];

/// A gazetteer entry: keyword to look for, display name, point, region.
struct Place {
    keyword: &'static str,
    name: &'static str,
    lat: f64,
    lng: f64,
    region: &'static str,
}

const fn place(
    keyword: &'static str,
    name: &'static str,
    lat: f64,
    lng: f64,
    region: &'static str,
) -> Place {
    Place {
        keyword,
        name,
        lat,
        lng,
        region,
    }
}

/// Ordered gazetteer. First textual match wins; cities and countries are
/// interleaved and the insertion order IS the precedence.
static GAZETTEER: &[Place] = &[
    place("washington", "Washington", 38.9072, -77.0369, "north_america"),
    place("new york", "New York", 40.7128, -74.0060, "north_america"),
    place("london", "London", 51.5074, -0.1278, "europe"),
    place("paris", "Paris", 48.8566, 2.3522, "europe"),
    place("berlin", "Berlin", 52.5200, 13.4050, "europe"),
    place("brussels", "Brussels", 50.8503, 4.3517, "europe"),
    place("rome", "Rome", 41.9028, 12.4964, "europe"),
    place("madrid", "Madrid", 40.4168, -3.7038, "europe"),
    place("warsaw", "Warsaw", 52.2297, 21.0122, "eastern_europe"),
    place("beijing", "Beijing", 39.9042, 116.4074, "asia"),
    place("shanghai", "Shanghai", 31.2304, 121.4737, "asia"),
    place("tokyo", "Tokyo", 35.6762, 139.6503, "asia"),
    place("seoul", "Seoul", 37.5665, 126.9780, "asia"),
    place("pyongyang", "Pyongyang", 39.0392, 125.7625, "asia"),
    place("north korea", "North Korea", 40.3399, 127.5101, "asia"),
    place("south korea", "South Korea", 35.9078, 127.7669, "asia"),
    place("delhi", "Delhi", 28.6139, 77.2090, "asia"),
    place("mumbai", "Mumbai", 19.0760, 72.8777, "asia"),
    place("islamabad", "Islamabad", 33.6844, 73.0479, "asia"),
    place("kabul", "Kabul", 34.5553, 69.2075, "middle_east"),
    place("tehran", "Tehran", 35.6892, 51.3890, "middle_east"),
    place("baghdad", "Baghdad", 33.3152, 44.3661, "middle_east"),
    place("riyadh", "Riyadh", 24.7136, 46.6753, "middle_east"),
    place("cairo", "Cairo", 30.0444, 31.2357, "middle_east"),
    place("istanbul", "Istanbul", 41.0082, 28.9784, "middle_east"),
    place("ankara", "Ankara", 39.9334, 32.8597, "middle_east"),
    place("beirut", "Beirut", 33.8938, 35.5018, "middle_east"),
    place("lebanon", "Lebanon", 33.8547, 35.8623, "middle_east"),
    place("yemen", "Yemen", 15.5527, 48.5164, "middle_east"),
    place("iran", "Iran", 32.4279, 53.6880, "middle_east"),
    place("iraq", "Iraq", 33.2232, 43.6793, "middle_east"),
    place("turkey", "Turkey", 38.9637, 35.2433, "middle_east"),
    place("egypt", "Egypt", 26.8206, 30.8025, "middle_east"),
    place("saudi arabia", "Saudi Arabia", 23.8859, 45.0792, "middle_east"),
    place("afghanistan", "Afghanistan", 33.9391, 67.7100, "middle_east"),
    place("nairobi", "Nairobi", -1.2921, 36.8219, "africa"),
    place("lagos", "Lagos", 6.5244, 3.3792, "africa"),
    place("johannesburg", "Johannesburg", -26.2041, 28.0473, "africa"),
    place("addis ababa", "Addis Ababa", 9.0054, 38.7636, "africa"),
    place("ethiopia", "Ethiopia", 9.1450, 40.4897, "africa"),
    place("nigeria", "Nigeria", 9.0820, 8.6753, "africa"),
    place("kenya", "Kenya", -0.0236, 37.9062, "africa"),
    place("congo", "Congo", -4.0383, 21.7587, "africa"),
    place("libya", "Libya", 26.3351, 17.2283, "africa"),
    // "somalia" must precede "mali": substring containment would let the
    // shorter name swallow it otherwise.
    place("somalia", "Somalia", 5.1521, 46.1996, "africa"),
    place("mali", "Mali", 17.5707, -3.9962, "africa"),
    place("mexico", "Mexico", 23.6345, -102.5528, "latin_america"),
    place("bogota", "Bogota", 4.7110, -74.0721, "latin_america"),
    place("caracas", "Caracas", 10.4806, -66.9036, "latin_america"),
    place("venezuela", "Venezuela", 6.4238, -66.5897, "latin_america"),
    place("colombia", "Colombia", 4.5709, -74.2973, "latin_america"),
    place("brazil", "Brazil", -14.2350, -51.9253, "latin_america"),
    place("argentina", "Argentina", -38.4161, -63.6167, "latin_america"),
    place("havana", "Havana", 23.1136, -82.3666, "latin_america"),
    place("canada", "Canada", 56.1304, -106.3468, "north_america"),
    place("united states", "United States", 37.0902, -95.7129, "north_america"),
    place("america", "United States", 37.0902, -95.7129, "north_america"),
    place("germany", "Germany", 51.1657, 10.4515, "europe"),
    place("france", "France", 46.2276, 2.2137, "europe"),
    place("britain", "United Kingdom", 55.3781, -3.4360, "europe"),
    place("united kingdom", "United Kingdom", 55.3781, -3.4360, "europe"),
    place("spain", "Spain", 40.4637, -3.7492, "europe"),
    place("italy", "Italy", 41.8719, 12.5674, "europe"),
    place("poland", "Poland", 51.9194, 19.1451, "eastern_europe"),
    place("belarus", "Belarus", 53.7098, 27.9534, "eastern_europe"),
    place("georgia", "Georgia", 42.3154, 43.3569, "eastern_europe"),
    place("armenia", "Armenia", 40.0691, 45.0382, "eastern_europe"),
    place("azerbaijan", "Azerbaijan", 40.1431, 47.5769, "eastern_europe"),
    place("china", "China", 35.8617, 104.1954, "asia"),
    place("taiwan", "Taiwan", 23.6978, 120.9605, "asia"),
    place("hong kong", "Hong Kong", 22.3193, 114.1694, "asia"),
    place("japan", "Japan", 36.2048, 138.2529, "asia"),
    place("india", "India", 20.5937, 78.9629, "asia"),
    place("pakistan", "Pakistan", 30.3753, 69.3451, "asia"),
    place("indonesia", "Indonesia", -0.7893, 113.9213, "southeast_asia"),
    place("malaysia", "Malaysia", 4.2105, 101.9758, "southeast_asia"),
    place("singapore", "Singapore", 1.3521, 103.8198, "southeast_asia"),
    place("australia", "Australia", -25.2744, 133.7751, "oceania"),
    place("sydney", "Sydney", -33.8688, 151.2093, "oceania"),
];

/// Secondary country checks for Southeast Asia, evaluated only when the
/// gazetteer found nothing.
static SOUTHEAST_ASIA: &[Place] = &[
    place("thailand", "Bangkok", 13.7563, 100.5018, "southeast_asia"),
    place("philippines", "Manila", 14.5995, 120.9842, "southeast_asia"),
    place("vietnam", "Hanoi", 21.0278, 105.8342, "southeast_asia"),
];

/// Economic stories without a place keyword get pinned to a regional
/// financial center based on secondary keywords.
static ECONOMY_TERMS: &[&str] = &["economy", "market", "finance"];

static FINANCIAL_CENTERS: &[(&[&str], Place)] = &[
    (
        &["united states", "america", "federal reserve", "wall street"],
        place("", "New York", 40.7128, -74.0060, "north_america"),
    ),
    (
        &["europe", "eurozone", "european union", "ecb"],
        place("", "Brussels", 50.8503, 4.3517, "europe"),
    ),
    (
        &["china", "yuan"],
        place("", "Beijing", 39.9042, 116.4074, "asia"),
    ),
    (
        &["japan", "yen"],
        place("", "Tokyo", 35.6762, 139.6503, "asia"),
    ),
];

/// Broad region words each map to one representative centroid.
static CONTINENTS: &[Place] = &[
    place("middle east", "Middle East", 33.2232, 43.6793, "middle_east"),
    place("europe", "Europe", 50.8503, 4.3517, "europe"),
    place("asia", "Asia", 34.0479, 100.6197, "asia"),
    place("africa", "Africa", 6.6111, 20.9394, "africa"),
    place("latin america", "Latin America", -14.2350, -51.9253, "latin_america"),
    place("south america", "South America", -14.2350, -51.9253, "latin_america"),
    place("north america", "North America", 37.0902, -95.7129, "north_america"),
];

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// Find the conflict zone (if any) mentioned in already-lowercased text.
///
/// Exposed separately because the classifier needs the same check at a
/// higher precedence than its keyword buckets.
pub fn conflict_match(text_lower: &str) -> Option<&'static ConflictZone> {
    CONFLICTS
        .iter()
        .find(|zone| contains_any(text_lower, zone.keywords))
}

/// Resolve free text to a location and coarse region.
///
/// Returns finite coordinates for every input; text with no geographic
/// signal maps to `(0, 0)` with region `"global"`.
pub fn detect_location(text: &str) -> GeoMatch {
    let lower = text.to_lowercase();

    if let Some(zone) = conflict_match(&lower) {
        return GeoMatch::named(zone.lat, zone.lng, zone.name, zone.region);
    }

    for rule in EXCLUSION_RULES {
        if contains_any(&lower, rule.any) && !contains_any(&lower, rule.none) {
            return GeoMatch::named(rule.lat, rule.lng, rule.name, rule.region);
        }
    }

    for entry in GAZETTEER {
        if lower.contains(entry.keyword) {
            return GeoMatch::named(entry.lat, entry.lng, entry.name, entry.region);
        }
    }

    for entry in SOUTHEAST_ASIA {
        if lower.contains(entry.keyword) {
            return GeoMatch::named(entry.lat, entry.lng, entry.name, entry.region);
        }
    }

    if contains_any(&lower, ECONOMY_TERMS) {
        for (countries, center) in FINANCIAL_CENTERS {
            if contains_any(&lower, countries) {
                return GeoMatch::named(center.lat, center.lng, center.name, center.region);
            }
        }
        // Economic text with no regional signal falls through to the
        // continent stage.
    }

    for entry in CONTINENTS {
        if lower.contains(entry.keyword) {
            return GeoMatch::named(entry.lat, entry.lng, entry.name, entry.region);
        }
    }

    GeoMatch::global()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_keyword_beats_generic_place() {
        // Zelensky alone is enough to pin the Ukraine centroid, even with
        // a generic capital in the same sentence.
        let hit = detect_location("Zelensky meets leaders in Washington");
        assert_eq!(hit.location.lat, 49.4871968);
        assert_eq!(hit.location.lng, 31.2718321);
        assert_eq!(hit.region, "eastern_europe");
    }

    #[test]
    fn test_ukraine_wins_over_moscow() {
        let hit = detect_location("Ukraine strikes targets near Moscow");
        assert_eq!(hit.location.name.as_deref(), Some("Ukraine"));
        assert_eq!(hit.location.lat, 49.4871968);
    }

    #[test]
    fn test_russia_without_ukraine_resolves_to_moscow() {
        let hit = detect_location("Putin addresses the Russian parliament");
        assert_eq!(hit.location.name.as_deref(), Some("Moscow"));
        assert_eq!(hit.region, "eastern_europe");
    }

    #[test]
    fn test_israel_without_gaza_resolves_to_jerusalem() {
        let hit = detect_location("Netanyahu announces new coalition in Israel");
        assert_eq!(hit.location.name.as_deref(), Some("Jerusalem"));
    }

    #[test]
    fn test_israel_with_gaza_resolves_to_gaza() {
        let hit = detect_location("Israel expands operation in Gaza");
        assert_eq!(hit.location.name.as_deref(), Some("Gaza"));
        assert_eq!(hit.region, "middle_east");
    }

    #[test]
    fn test_gazetteer_city() {
        let hit = detect_location("Protests continue in London this weekend");
        assert_eq!(hit.location.name.as_deref(), Some("London"));
        assert_eq!(hit.region, "europe");
    }

    #[test]
    fn test_gazetteer_order_somalia_before_mali() {
        let hit = detect_location("Drought worsens across Somalia");
        assert_eq!(hit.location.name.as_deref(), Some("Somalia"));
    }

    #[test]
    fn test_southeast_asia_fallback() {
        let hit = detect_location("Flooding displaces thousands in Thailand");
        assert_eq!(hit.location.name.as_deref(), Some("Bangkok"));
        assert_eq!(hit.region, "southeast_asia");
    }

    #[test]
    fn test_economy_fallback_to_financial_center() {
        let hit = detect_location("Markets rally after Federal Reserve decision");
        assert_eq!(hit.location.name.as_deref(), Some("New York"));
        assert_eq!(hit.region, "north_america");
    }

    #[test]
    fn test_economy_without_region_falls_through() {
        let hit = detect_location("Global market uncertainty grows");
        // No secondary region keyword and no continent word, so global.
        assert_eq!(hit.region, "global");
        assert_eq!(hit.location, crate::models::Location::global());
    }

    #[test]
    fn test_continent_fallback() {
        let hit = detect_location("Tensions rise across the Middle East");
        assert_eq!(hit.region, "middle_east");
        assert_eq!(hit.location.name.as_deref(), Some("Middle East"));
    }

    #[test]
    fn test_no_match_is_global_and_finite() {
        let hit = detect_location("Recipe of the week: lemon tart");
        assert_eq!(hit.region, "global");
        assert!(hit.location.lat.is_finite());
        assert!(hit.location.lng.is_finite());
        assert_eq!(hit.location.lat, 0.0);
        assert_eq!(hit.location.lng, 0.0);
    }

    #[test]
    fn test_case_folding() {
        let upper = detect_location("CRISIS IN KHARTOUM DEEPENS");
        assert_eq!(upper.location.name.as_deref(), Some("Sudan"));
    }

    #[test]
    fn test_every_conflict_keyword_hits_its_zone() {
        for zone in CONFLICTS {
            for kw in zone.keywords {
                let hit = detect_location(&format!("report mentions {kw} today"));
                assert_eq!(
                    hit.location.name.as_deref(),
                    Some(zone.name),
                    "keyword {kw:?} should resolve to {}",
                    zone.name
                );
            }
        }
    }
}
