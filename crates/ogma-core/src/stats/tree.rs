//! The aggregation tree: one generic node type walked by an ordered list of
//! per-level key extractors.
//!
//! The hierarchy depth is configuration, not a type stack: each level names
//! a discriminator drawn from the record, children appear on first insertion
//! at a key, and only leaves accumulate area directly. Ancestor areas are
//! derived by [`Node::total`], which assigns from children rather than
//! incrementing, so re-running it never double-counts.

use std::collections::BTreeMap;

use crate::record::{ClassifiedRecord, SeralStage};

/// Operating-area bucket for records outside every operating area.
pub const OUTSIDE_OPERATING_AREA: &str = "Outside Operating Area";

/// Discriminator key at one tree level.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Key {
    Text(String),
    Age(u8),
}

impl Key {
    pub fn text(value: &str) -> Self {
        Key::Text(value.to_string())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Key::Text(s) => Some(s),
            Key::Age(_) => None,
        }
    }

    pub fn as_age(&self) -> Option<u8> {
        match self {
            Key::Age(a) => Some(*a),
            Key::Text(_) => None,
        }
    }
}

/// One level of the hierarchy: a diagnostic name and the key extractor.
pub struct Level {
    pub name: &'static str,
    pub key: fn(&ClassifiedRecord) -> Key,
}

/// Depth of the age-class level, where the seral tag lives.
pub const DEPTH_AGE_CLASS: usize = 4;
/// Depth of the operating-area level, where corridor area accumulates.
pub const DEPTH_OPERATING_AREA: usize = 5;

/// The aggregation hierarchy, outermost level first. Disturbance type, zone,
/// and biodiversity option are upper-cased for key normalization; harvested
/// land at age class 0 folds into the forested bucket (see
/// [`crate::record::LandType::folded`]).
pub const HIERARCHY: [Level; 8] = [
    Level {
        name: "disturbance_type",
        key: |r| Key::Text(r.disturbance_type.to_uppercase()),
    },
    Level {
        name: "zone",
        key: |r| Key::Text(r.zone.to_uppercase()),
    },
    Level {
        name: "bio_option",
        key: |r| Key::Text(r.bio_option.to_uppercase()),
    },
    Level {
        name: "reserve_status",
        key: |r| Key::text(r.reserve_status.as_str()),
    },
    Level {
        name: "age_class",
        key: |r| Key::Age(r.age_class),
    },
    Level {
        name: "operating_area",
        key: |r| match &r.operating_area {
            Some(oa) => Key::text(oa),
            None => Key::text(OUTSIDE_OPERATING_AREA),
        },
    },
    Level {
        name: "land_type",
        key: |r| Key::text(r.land_type.folded(r.age_class).as_str()),
    },
    Level {
        name: "operability",
        key: |r| Key::text(r.operability.as_str()),
    },
];

/// One node of the hierarchy. The root of a unit's tree is a `Node` whose
/// children are disturbance-type nodes.
#[derive(Debug, Clone, Default)]
pub struct Node {
    /// Accumulated area for leaves; assigned by [`Node::total`] for
    /// ancestors, stale zero before that pass.
    pub area: f64,
    /// Seral tag, carried at age-class depth. Overwritten on every insert
    /// landing at that node: last write wins.
    pub seral: Option<SeralStage>,
    /// Corridor accumulator, carried at operating-area depth. [`Node::total`]
    /// never touches it; read it at any level via
    /// [`Node::corridor_total`].
    pub corridor_area: f64,
    children: BTreeMap<Key, Node>,
}

impl Node {
    /// Walk the full hierarchy from the root, creating nodes as needed, and
    /// add the record's area to the leaf. Tags the age-class node's seral
    /// stage and, for corridor records, bumps the operating-area node's
    /// corridor accumulator on the way down.
    pub fn insert(&mut self, record: &ClassifiedRecord) {
        let mut node = self;
        for (depth, level) in HIERARCHY.iter().enumerate() {
            node = node.children.entry((level.key)(record)).or_default();
            if depth == DEPTH_AGE_CLASS {
                node.seral = record.seral;
            }
            if depth == DEPTH_OPERATING_AREA && record.corridor {
                node.corridor_area += record.area_ha;
            }
        }
        node.area += record.area_ha;
    }

    /// Bottom-up area propagation: every ancestor's area is ASSIGNED the sum
    /// of its children's totals; leaves keep their accumulated value.
    /// Idempotent: repeated calls recompute the same sums. Returns this
    /// node's total.
    pub fn total(&mut self) -> f64 {
        if !self.children.is_empty() {
            self.area = self.children.values_mut().map(Node::total).sum();
        }
        self.area
    }

    /// Corridor area of this node's subtree.
    pub fn corridor_total(&self) -> f64 {
        self.corridor_area
            + self
                .children
                .values()
                .map(Node::corridor_total)
                .sum::<f64>()
    }

    pub fn child(&self, key: &Key) -> Option<&Node> {
        self.children.get(key)
    }

    /// Child under a text key, allocating the probe key.
    pub fn child_text(&self, key: &str) -> Option<&Node> {
        self.children.get(&Key::text(key))
    }

    /// Children in key order (deterministic walk).
    pub fn children(&self) -> impl Iterator<Item = (&Key, &Node)> {
        self.children.iter()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
