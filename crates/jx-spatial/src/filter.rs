//! Way-tag filters for each [`NetworkType`].
//!
//! The same rule table drives two things:
//!
//! - [`accepts`]: a tag predicate applied to every way, whatever the source
//!   (Overpass response or PBF extract).
//! - [`overpass_selector`]: the rule table rendered as Overpass QL tag
//!   filters, so the server only ships ways the predicate would keep.
//!
//! Exclusions follow the unanchored regex semantics of the usual OSM
//! network filters: a value is rejected when any listed word occurs in it,
//! so `highway=services` falls to `service` and `highway=unknown` to `no`.
//! [`accepts`] applies the same substring rule the rendered QL applies
//! server-side.

use jx_core::NetworkType;

/// Tag rules for one network type.  A way passes when it has a `highway`
/// tag and violates none of the exclusions.
struct Rules {
    /// Reject ways tagged `area=yes`.
    exclude_area:     bool,
    /// Rejected `highway=*` values.
    highway:          &'static [&'static str],
    /// Rejected `service=*` values.
    service:          &'static [&'static str],
    /// Keys whose value `no` rejects the way (`motorcar=no`, `foot=no`, …).
    denied_when_no:   &'static [&'static str],
}

const DRIVE_HIGHWAY: &[&str] = &[
    "abandoned", "bridleway", "bus_guideway", "construction", "corridor", "cycleway",
    "elevator", "escalator", "footway", "no", "path", "pedestrian", "planned", "platform",
    "proposed", "raceway", "razed", "service", "steps", "track",
];

const DRIVE_SERVICE_HIGHWAY: &[&str] = &[
    "abandoned", "bridleway", "bus_guideway", "construction", "corridor", "cycleway",
    "elevator", "escalator", "footway", "no", "path", "pedestrian", "planned", "platform",
    "proposed", "raceway", "razed", "steps", "track",
];

const WALK_HIGHWAY: &[&str] = &[
    "abandoned", "bus_guideway", "construction", "cycleway", "motor", "no", "planned",
    "platform", "proposed", "raceway", "razed",
];

const BIKE_HIGHWAY: &[&str] = &[
    "abandoned", "bus_guideway", "construction", "corridor", "elevator", "escalator",
    "footway", "motor", "no", "planned", "platform", "proposed", "raceway", "razed", "steps",
];

const ALL_HIGHWAY: &[&str] = &[
    "abandoned", "construction", "no", "planned", "platform", "proposed", "raceway", "razed",
];

fn rules(network_type: NetworkType) -> Rules {
    match network_type {
        NetworkType::Drive => Rules {
            exclude_area:   true,
            highway:        DRIVE_HIGHWAY,
            service:        &["alley", "driveway", "emergency_access", "parking", "parking_aisle", "private"],
            denied_when_no: &["motor_vehicle", "motorcar"],
        },
        NetworkType::DriveService => Rules {
            exclude_area:   true,
            highway:        DRIVE_SERVICE_HIGHWAY,
            service:        &["emergency_access", "parking", "parking_aisle", "private"],
            denied_when_no: &["motor_vehicle", "motorcar"],
        },
        NetworkType::Walk => Rules {
            exclude_area:   true,
            highway:        WALK_HIGHWAY,
            service:        &["private"],
            denied_when_no: &["foot"],
        },
        NetworkType::Bike => Rules {
            exclude_area:   true,
            highway:        BIKE_HIGHWAY,
            service:        &["private"],
            denied_when_no: &["bicycle"],
        },
        NetworkType::All => Rules {
            exclude_area:   true,
            highway:        ALL_HIGHWAY,
            service:        &["private"],
            denied_when_no: &[],
        },
    }
}

/// Value of `key` among `tags`, if present.
fn tag<'a>(tags: &[(&'a str, &'a str)], key: &str) -> Option<&'a str> {
    tags.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// `true` if a way with these tags belongs to the `network_type` network.
pub fn accepts(network_type: NetworkType, tags: &[(&str, &str)]) -> bool {
    let r = rules(network_type);

    let Some(highway) = tag(tags, "highway") else {
        return false;
    };
    if matches_any(highway, r.highway) {
        return false;
    }
    if r.exclude_area && tag(tags, "area").is_some_and(|v| matches_any(v, &["yes"])) {
        return false;
    }
    if tag(tags, "service").is_some_and(|v| matches_any(v, r.service)) {
        return false;
    }
    if r.denied_when_no.iter().any(|k| tag(tags, k).is_some_and(|v| matches_any(v, &["no"]))) {
        return false;
    }
    !tag(tags, "access").is_some_and(|v| matches_any(v, &["private"]))
}

/// Render the rules as a chain of Overpass QL tag filters, e.g.
/// `["highway"]["area"!~"yes"]…`.
pub fn overpass_selector(network_type: NetworkType) -> String {
    let r = rules(network_type);
    let mut q = String::from("[\"highway\"]");
    if r.exclude_area {
        q.push_str(&negated("area", &["yes"]));
    }
    q.push_str(&negated("highway", r.highway));
    for key in r.denied_when_no {
        q.push_str(&negated(key, &["no"]));
    }
    q.push_str(&negated("service", r.service));
    q.push_str(&negated("access", &["private"]));
    q
}

fn negated(key: &str, values: &[&str]) -> String {
    format!("[\"{key}\"!~\"{}\"]", values.join("|"))
}

/// `true` if any of `words` occurs in `value`, like an unanchored
/// `a|b|c` regex.
fn matches_any(value: &str, words: &[&str]) -> bool {
    words.iter().any(|w| value.contains(w))
}

// ── One-way handling ──────────────────────────────────────────────────────────

/// Which directed edges a way contributes between consecutive nodes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Both,
    /// Along the way's node order only.
    Forward,
    /// Against the way's node order only (`oneway=-1`).
    Reverse,
}

/// Edge direction for a way, following OSM one-way conventions.
///
/// `oneway=yes|true|1|F` and `junction=roundabout` are forward one-way,
/// `oneway=-1|reverse|T` reversed.  Network types that ignore one-way
/// restrictions (walking) always yield [`Direction::Both`].
pub fn direction(network_type: NetworkType, tags: &[(&str, &str)]) -> Direction {
    if !network_type.respects_oneway() {
        return Direction::Both;
    }
    match tag(tags, "oneway") {
        Some("-1" | "reverse" | "T") => Direction::Reverse,
        Some("yes" | "true" | "1" | "F") => Direction::Forward,
        _ if tag(tags, "junction") == Some("roundabout") => Direction::Forward,
        _ => Direction::Both,
    }
}
