// src/campus/map.rs
//! What the browser needs to draw the campus map, and the directions deep
//! link. Routing itself happens in the external maps service.

use super::directory::{Category, Coordinates, LocationDirectory, PointOfInterest};
use serde::Serialize;
use thiserror::Error;

pub const CAMPUS_CENTER: Coordinates = Coordinates::new(12.8230, 80.0444);
pub const DEFAULT_ZOOM: u8 = 16;
pub const FOCUS_ZOOM: u8 = 17;

const DIRECTIONS_BASE: &str = "https://www.google.com/maps/dir/?api=1";
const TRAVEL_MODE: &str = "walking";

pub const MISSING_ORIGIN_PROMPT: &str = "Please select a starting point or enable location services";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapError {
    #[error("Please select a starting point or enable location services")]
    MissingOrigin,
    #[error("Unknown location: {0}")]
    UnknownLocation(String),
    #[error("Coordinates out of range")]
    InvalidCoordinates,
    #[error("Map is currently unavailable")]
    Unavailable,
}

#[derive(Debug, Clone, Serialize)]
pub struct Viewport {
    pub center: Coordinates,
    pub zoom: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub title: String,
    pub position: Coordinates,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Markers for the device are drawn as a dot rather than a pin.
    pub is_device: bool,
}

impl From<&PointOfInterest> for Marker {
    fn from(location: &PointOfInterest) -> Self {
        Self {
            title: location.name.to_string(),
            position: location.coordinates,
            description: Some(location.description.to_string()),
            category: Some(location.category),
            is_device: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MapControls {
    pub map_type: bool,
    pub street_view: bool,
    pub fullscreen: bool,
    pub hide_poi_labels: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapConfig {
    pub api_key: String,
    pub viewport: Viewport,
    pub controls: MapControls,
    pub markers: Vec<Marker>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DevicePlot {
    pub marker: Marker,
    pub pan_to: Coordinates,
}

/// Where a route starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteOrigin {
    Location { coordinates: Coordinates },
    Device { coordinates: Coordinates },
}

impl RouteOrigin {
    pub fn coordinates(&self) -> Coordinates {
        match self {
            RouteOrigin::Location { coordinates } | RouteOrigin::Device { coordinates } => *coordinates,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Directions {
    pub origin: RouteOrigin,
    pub destination: String,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct MapViewController {
    directory: LocationDirectory,
    api_key: Option<String>,
}

impl MapViewController {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            directory: LocationDirectory,
            api_key,
        }
    }

    pub fn directory(&self) -> LocationDirectory {
        self.directory
    }

    pub fn map_config(&self) -> Result<MapConfig, MapError> {
        let api_key = self.api_key.clone().ok_or(MapError::Unavailable)?;
        Ok(MapConfig {
            api_key,
            viewport: Viewport {
                center: CAMPUS_CENTER,
                zoom: DEFAULT_ZOOM,
            },
            controls: MapControls {
                map_type: true,
                street_view: true,
                fullscreen: true,
                hide_poi_labels: true,
            },
            markers: self.directory.all().iter().map(Marker::from).collect(),
        })
    }

    pub fn focus(&self, name: &str) -> Result<Viewport, MapError> {
        let location = self.lookup(name)?;
        Ok(Viewport {
            center: location.coordinates,
            zoom: FOCUS_ZOOM,
        })
    }

    pub fn plot_device_position(&self, position: Coordinates) -> Result<DevicePlot, MapError> {
        if !position.is_valid() {
            return Err(MapError::InvalidCoordinates);
        }
        Ok(DevicePlot {
            marker: Marker {
                title: "Your Location".to_string(),
                position,
                description: None,
                category: None,
                is_device: true,
            },
            pan_to: position,
        })
    }

    /// Walking directions to `to`, starting from the selected location when
    /// there is one and from the device position otherwise.
    pub fn directions(
        &self,
        from: Option<&str>,
        device: Option<Coordinates>,
        to: &str,
    ) -> Result<Directions, MapError> {
        let destination = self.lookup(to)?;

        let origin = match (from, device) {
            (Some(name), _) => RouteOrigin::Location {
                coordinates: self.lookup(name)?.coordinates,
            },
            (None, Some(position)) if position.is_valid() => RouteOrigin::Device { coordinates: position },
            (None, Some(_)) => return Err(MapError::InvalidCoordinates),
            (None, None) => return Err(MapError::MissingOrigin),
        };

        Ok(Directions {
            origin,
            destination: destination.name.to_string(),
            url: directions_url(origin.coordinates(), destination.coordinates),
        })
    }

    fn lookup(&self, name: &str) -> Result<&'static PointOfInterest, MapError> {
        self.directory
            .find(name)
            .ok_or_else(|| MapError::UnknownLocation(name.to_string()))
    }
}

pub fn directions_url(origin: Coordinates, destination: Coordinates) -> String {
    format!(
        "{}&origin={}&destination={}&travelmode={}",
        DIRECTIONS_BASE,
        origin.to_query_value(),
        destination.to_query_value(),
        TRAVEL_MODE
    )
}
