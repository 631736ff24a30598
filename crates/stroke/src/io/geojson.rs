use std::path::Path;

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, StrokeError},
    types::{ContourKind, Point, Polygon, StrokeOutline},
};

/// Properties attached to every exported polygon feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PolygonProperties {
    /// Discovery order within the stroke
    pub id: usize,
    pub kind: ContourKind,
    pub area: f64,
    pub perimeter: f64,
    pub vertex_count: usize,
}

impl PolygonProperties {
    pub fn of(id: usize, polygon: &Polygon) -> Self {
        Self {
            id,
            kind: polygon.kind,
            area: polygon.area(),
            perimeter: polygon.perimeter(),
            vertex_count: polygon.points.len(),
        }
    }
}

/// The polygon as a GeoJSON ring, closed by repeating its first point.
fn closed_ring(points: &[Point]) -> Vec<Vec<f64>> {
    points
        .iter()
        .chain(points.first())
        .map(|p| vec![p.x as f64, p.y as f64])
        .collect()
}

fn to_object<T: Serialize>(value: &T) -> Result<JsonObject> {
    match serde_json::to_value(value)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(StrokeError::InvalidGeoJson(format!("expected an object, got {other}"))),
    }
}

impl StrokeOutline {
    /// One polygon feature per contour. Holes are exported as their own
    /// features, tagged by `kind`, in the order they were found.
    pub fn to_geojson(&self) -> Result<FeatureCollection> {
        let mut features = Vec::with_capacity(self.polygons.len());

        for (i, polygon) in self.polygons.iter().enumerate() {
            let geometry = Geometry::new(Value::Polygon(vec![closed_ring(&polygon.points)]));
            features.push(Feature {
                bbox: None,
                geometry: Some(geometry),
                id: Some(geojson::feature::Id::Number(serde_json::Number::from(i))),
                properties: Some(to_object(&PolygonProperties::of(i, polygon))?),
                foreign_members: None,
            });
        }

        let mut foreign_members = JsonObject::new();
        foreign_members.insert("image_width".to_string(), self.image_width.into());
        foreign_members.insert("image_height".to_string(), self.image_height.into());
        foreign_members.insert("lowest_row".to_string(), self.lowest_row.into());
        foreign_members.insert("polygon_count".to_string(), self.polygons.len().into());

        Ok(FeatureCollection {
            bbox: None,
            features,
            foreign_members: Some(foreign_members),
        })
    }

    /// Export to GeoJSON and serialize to JSON string
    pub fn to_geojson_string(&self) -> Result<String> {
        let geojson = self.to_geojson()?;
        Ok(serde_json::to_string_pretty(&geojson)?)
    }

    /// Save GeoJSON to file
    pub fn save_geojson(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_geojson_string()?)?;
        Ok(())
    }

    /// Read back a collection written by [`StrokeOutline::to_geojson_string`].
    pub fn from_geojson_str(geojson_str: &str) -> Result<Self> {
        let collection: FeatureCollection = geojson_str.parse()?;

        let members = collection
            .foreign_members
            .as_ref()
            .ok_or_else(|| StrokeError::InvalidGeoJson("missing stroke metadata".to_string()))?;
        let dimension = |key: &str| {
            members
                .get(key)
                .and_then(|v| v.as_u64())
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| StrokeError::InvalidGeoJson(format!("missing or invalid {key}")))
        };
        let image_width = dimension("image_width")?;
        let image_height = dimension("image_height")?;
        let lowest_row = members
            .get("lowest_row")
            .and_then(|v| v.as_u64())
            .and_then(|v| u32::try_from(v).ok());

        let mut polygons = Vec::with_capacity(collection.features.len());
        for feature in collection.features {
            let properties: PolygonProperties = serde_json::from_value(
                feature.properties.map(serde_json::Value::Object).unwrap_or_default(),
            )?;
            let Some(Geometry { value: Value::Polygon(rings), .. }) = feature.geometry else {
                return Err(StrokeError::InvalidGeoJson(format!(
                    "feature {} is not a polygon",
                    properties.id
                )));
            };
            let Some(ring) = rings.first() else {
                continue;
            };
            // drop the closing repeat
            let open = &ring[..ring.len().saturating_sub(1)];
            let points = open
                .iter()
                .map(|c| Point::new(c[0] as i32, c[1] as i32))
                .collect();
            polygons.push(Polygon::new(properties.kind, points));
        }

        Ok(Self {
            polygons,
            image_width,
            image_height,
            lowest_row,
        })
    }
}
