use std::{collections::BTreeSet, fmt, str::FromStr};

use chrono::{DateTime, Local};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::{
    geometry::{Point, Ring},
    ExampleData,
};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ZoneKind {
    Delivery,
    Pickup,
    Emergency,
    Restricted,
    Premium,
}

impl ZoneKind {
    pub const ALL: [ZoneKind; 5] = [
        ZoneKind::Delivery,
        ZoneKind::Pickup,
        ZoneKind::Emergency,
        ZoneKind::Restricted,
        ZoneKind::Premium,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delivery => "delivery",
            Self::Pickup => "pickup",
            Self::Emergency => "emergency",
            Self::Restricted => "restricted",
            Self::Premium => "premium",
        }
    }

    pub fn default_style(&self) -> ZoneStyle {
        let (fill, stroke) = match self {
            Self::Delivery => ("#4CAF50", "#2E7D32"),
            Self::Pickup => ("#2196F3", "#1565C0"),
            Self::Emergency => ("#F44336", "#C62828"),
            Self::Restricted => ("#9E9E9E", "#424242"),
            Self::Premium => ("#FFC107", "#FF8F00"),
        };
        ZoneStyle {
            fill_color: fill.to_owned(),
            fill_opacity: 0.35,
            stroke_color: stroke.to_owned(),
            stroke_weight: 2,
        }
    }
}

impl fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownZoneKind(pub String);

impl fmt::Display for UnknownZoneKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown zone kind: {}", self.0)
    }
}

impl std::error::Error for UnknownZoneKind {}

impl FromStr for ZoneKind {
    type Err = UnknownZoneKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ZoneKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownZoneKind(s.to_owned()))
    }
}

/// Presentational styling, never consulted by the engine itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ZoneStyle {
    pub fill_color: String,
    pub fill_opacity: f32,
    pub stroke_color: String,
    pub stroke_weight: u32,
}

/// Everything about a zone except its boundary, as supplied on creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ZoneMetadata {
    pub name: String,
    pub kind: ZoneKind,
    pub style: ZoneStyle,
    #[serde(default)]
    pub applicable_services: BTreeSet<String>,
    pub active: bool,
}

impl ZoneMetadata {
    /// Active zone with the default style of its kind and no services.
    pub fn new<S: Into<String>>(name: S, kind: ZoneKind) -> Self {
        Self {
            name: name.into(),
            kind,
            style: kind.default_style(),
            applicable_services: BTreeSet::new(),
            active: true,
        }
    }

    pub fn with_services<I, S>(mut self, services: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.applicable_services = services.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_style(mut self, style: ZoneStyle) -> Self {
        self.style = style;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceZone {
    pub id: Id<ServiceZone>,
    pub name: String,
    pub kind: ZoneKind,
    pub boundary: Ring,
    pub style: ZoneStyle,
    pub applicable_services: BTreeSet<String>,
    pub active: bool,
    pub created_at: DateTime<Local>,
    pub updated_at: DateTime<Local>,
}

impl HasId for ServiceZone {
    type IdType = u64;
}

impl ServiceZone {
    pub fn new(
        id: Id<ServiceZone>,
        boundary: Ring,
        metadata: ZoneMetadata,
        now: DateTime<Local>,
    ) -> Self {
        Self {
            id,
            name: metadata.name,
            kind: metadata.kind,
            boundary,
            style: metadata.style,
            applicable_services: metadata.applicable_services,
            active: metadata.active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn metadata(&self) -> ZoneMetadata {
        ZoneMetadata {
            name: self.name.clone(),
            kind: self.kind,
            style: self.style.clone(),
            applicable_services: self.applicable_services.clone(),
            active: self.active,
        }
    }

    pub fn offers(&self, service: &str) -> bool {
        self.applicable_services.contains(service)
    }
}

impl ExampleData for ServiceZone {
    fn example_data() -> Self {
        let now = Local::now();
        ServiceZone::new(
            Id::new(1),
            Ring::new(vec![
                Point::new(17.45, 78.50),
                Point::new(17.40, 78.50),
                Point::new(17.40, 78.44),
                Point::new(17.45, 78.44),
            ]),
            ZoneMetadata::new("Banjara Hills", ZoneKind::Delivery)
                .with_services(["medicine-delivery", "lab-collection"]),
            now,
        )
    }
}

/// Partial update of a zone; absent fields are left untouched.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ZonePatch {
    pub name: Option<String>,
    pub kind: Option<ZoneKind>,
    pub boundary: Option<Ring>,
    pub style: Option<ZoneStyle>,
    pub applicable_services: Option<BTreeSet<String>>,
    pub active: Option<bool>,
}

impl ZonePatch {
    pub fn boundary(boundary: Ring) -> Self {
        Self {
            boundary: Some(boundary),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ZoneFilter {
    pub kind: Option<ZoneKind>,
    pub active: Option<bool>,
}

impl ZoneFilter {
    pub fn matches(&self, zone: &ServiceZone) -> bool {
        self.kind.map_or(true, |kind| zone.kind == kind)
            && self.active.map_or(true, |active| zone.active == active)
    }
}
