#![forbid(unsafe_code)]

//! Geofence extraction: polygon vertices and the maximum altitude.

use permart_core::{ns, Error};
use permart_xml::{child_elements, find_element};

/// One polygon vertex, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub latitude: f64,
    pub longitude: f64,
}

/// The permitted flight area.
#[derive(Debug, Clone, PartialEq)]
pub struct Fence {
    /// Polygon vertices in document order.
    pub vertices: Vec<Vertex>,
    /// Ceiling declared by `FlightParameters/@maxAltitude`.
    pub max_altitude: f64,
}

impl Fence {
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Read the geofence polygon and maximum altitude from a verified artifact.
/// Only [`crate::Handle`] calls this, after verification succeeded.
pub(crate) fn extract_fence(doc: &roxmltree::Document<'_>) -> Result<Fence, Error> {
    let vertices = extract_vertices(doc)?;
    let max_altitude = extract_max_altitude(doc)?;
    Ok(Fence {
        vertices,
        max_altitude,
    })
}

/// The `Coordinate` children of the first `Coordinates` element.
///
/// Every vertex must carry both `latitude` and `longitude`; one bad vertex
/// rejects the whole polygon.
fn extract_vertices(doc: &roxmltree::Document<'_>) -> Result<Vec<Vertex>, Error> {
    let coordinates = find_element(doc, ns::node::COORDINATES)
        .ok_or_else(|| Error::BadFence("Coordinates element missing".into()))?;

    let count = child_elements(coordinates, ns::node::COORDINATE).count();
    if count == 0 {
        return Err(Error::BadFence("Coordinates has no Coordinate".into()));
    }

    let mut vertices = Vec::with_capacity(count);
    for (index, coordinate) in child_elements(coordinates, ns::node::COORDINATE).enumerate() {
        let latitude = coordinate_attr(coordinate, ns::attr::LATITUDE, index)?;
        let longitude = coordinate_attr(coordinate, ns::attr::LONGITUDE, index)?;
        vertices.push(Vertex {
            latitude,
            longitude,
        });
    }
    log::debug!("geofence has {} vertices", vertices.len());
    Ok(vertices)
}

/// `FlightParameters/@maxAltitude`.
fn extract_max_altitude(doc: &roxmltree::Document<'_>) -> Result<f64, Error> {
    let params = find_element(doc, ns::node::FLIGHT_PARAMETERS)
        .ok_or_else(|| Error::BadAltitude("FlightParameters element missing".into()))?;
    let value = params
        .attribute(ns::attr::MAX_ALTITUDE)
        .ok_or_else(|| Error::BadAltitude("maxAltitude missing".into()))?;
    parse_decimal(value).ok_or_else(|| Error::BadAltitude(format!("maxAltitude {value:?}")))
}

fn coordinate_attr(
    node: roxmltree::Node<'_, '_>,
    name: &str,
    index: usize,
) -> Result<f64, Error> {
    let value = node
        .attribute(name)
        .ok_or_else(|| Error::BadFence(format!("Coordinate {index} has no {name}")))?;
    parse_decimal(value)
        .ok_or_else(|| Error::BadFence(format!("Coordinate {index} {name} {value:?}")))
}

/// Locale-independent decimal parsing. Non-finite values are refused.
fn parse_decimal(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
