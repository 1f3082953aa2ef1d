//! Cadastral object kinds and their map service layers.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Map service that renders a selected object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
pub enum SelectionService {
    /// Parcels and buildings.
    CadastreSelected,
    /// Zones of every kind.
    #[strum(serialize = "ZONESSelected")]
    ZonesSelected,
}

/// Kind of cadastral object that can be focused on the map.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ObjectType {
    /// Land parcel.
    Zu,
    /// Capital construction object (building, structure).
    Oks,
    /// Territorial zone.
    Tzone,
    /// Generic zone.
    Zone,
    /// Zone with special land-use conditions.
    Zouit,
}

impl ObjectType {
    /// All object types, in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Zu, Self::Oks, Self::Tzone, Self::Zone, Self::Zouit]
    }

    /// Service layer ids that render objects of this type.
    #[must_use]
    pub const fn layers(self) -> &'static [u32] {
        match self {
            Self::Zu => &[6, 7, 8, 9],
            Self::Oks => &[0, 1, 2, 3, 4, 5],
            Self::Tzone => &[1],
            Self::Zone => &[6],
            Self::Zouit => &[0],
        }
    }

    /// The map service hosting this type's layers.
    #[must_use]
    pub const fn service(self) -> SelectionService {
        match self {
            Self::Zu | Self::Oks => SelectionService::CadastreSelected,
            Self::Tzone | Self::Zone | Self::Zouit => SelectionService::ZonesSelected,
        }
    }

    /// `MapServer` URL for this type under the given layers API root.
    #[must_use]
    pub fn service_url(self, layers_api_url: &str) -> String {
        format!(
            "{}/arcgis/rest/services/PKK6/{}/MapServer",
            layers_api_url.trim_end_matches('/'),
            self.service()
        )
    }
}
