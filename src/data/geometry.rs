use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use crate::error::LoadError;

const COUNTRIES_OBJECT: &str = "countries";

/// Closed ring of `(longitude, latitude)` positions.
pub type Ring = Vec<(f64, f64)>;

/// One country outline; each polygon is an outer ring followed by its holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryShape {
    pub id: Option<String>,
    pub name: Option<String>,
    pub polygons: Vec<Vec<Ring>>,
}

impl CountryShape {
    /// Name the map keys and labels the country with, falling back to its id.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.name.as_deref().or(self.id.as_deref())
    }

    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        self.polygons.iter().flatten()
    }
}

/// Country outlines decoded from a world-atlas topology.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldGeometry {
    pub countries: Vec<CountryShape>,
}

impl WorldGeometry {
    #[must_use]
    pub fn country(&self, name: &str) -> Option<&CountryShape> {
        self.countries
            .iter()
            .find(|shape| shape.name.as_deref() == Some(name))
    }
}

/// Quantization transform of a topology; arcs are then delta-encoded.
#[derive(Debug, Clone, Copy, Deserialize)]
struct TopologyTransform {
    scale: [f64; 2],
    translate: [f64; 2],
}

struct TopologyDecoder<'a> {
    source_name: &'a str,
    arcs: Vec<Ring>,
}

impl TopologyDecoder<'_> {
    fn malformed(&self, reason: impl Into<String>) -> LoadError {
        LoadError::Json {
            source_name: self.source_name.to_owned(),
            reason: reason.into(),
        }
    }

    /// Joins the referenced arcs into one ring. A negative index `!i` walks
    /// arc `i` backwards; each arc after the first drops its shared start point.
    fn ring(&self, references: &Value) -> Result<Ring, LoadError> {
        let references = references
            .as_array()
            .ok_or_else(|| self.malformed("ring must be an array of arc indexes"))?;
        let mut ring = Ring::new();
        for reference in references {
            let index = reference.as_i64().ok_or_else(|| {
                self.malformed(format!("arc reference `{reference}` is not an integer"))
            })?;
            let (arc_index, reversed) = if index < 0 { (!index, true) } else { (index, false) };
            let arc = usize::try_from(arc_index)
                .ok()
                .and_then(|arc_index| self.arcs.get(arc_index))
                .ok_or_else(|| self.malformed(format!("arc {index} does not exist")))?;
            let skip = usize::from(!ring.is_empty());
            if reversed {
                ring.extend(arc.iter().rev().skip(skip).copied());
            } else {
                ring.extend(arc.iter().skip(skip).copied());
            }
        }
        Ok(ring)
    }

    /// Rings of one polygon, dropping those too short to enclose an area.
    fn polygon(&self, rings: &Value) -> Result<Vec<Ring>, LoadError> {
        let rings = rings
            .as_array()
            .ok_or_else(|| self.malformed("polygon must be an array of rings"))?;
        let mut decoded = Vec::with_capacity(rings.len());
        for references in rings {
            let ring = self.ring(references)?;
            if ring.len() >= 3 {
                decoded.push(ring);
            }
        }
        Ok(decoded)
    }

    fn polygons(&self, geometry: &Value) -> Result<Vec<Vec<Ring>>, LoadError> {
        let Some(arcs) = geometry.get("arcs") else {
            return Ok(Vec::new());
        };
        let polygons = match geometry.get("type").and_then(Value::as_str) {
            Some("Polygon") => vec![self.polygon(arcs)?],
            Some("MultiPolygon") => arcs
                .as_array()
                .ok_or_else(|| self.malformed("multipolygon must be an array of polygons"))?
                .iter()
                .map(|polygon| self.polygon(polygon))
                .collect::<Result<Vec<_>, LoadError>>()?,
            other => {
                trace!(geometry_type = ?other, "skipping non-areal geometry");
                Vec::new()
            }
        };
        Ok(polygons
            .into_iter()
            .filter(|rings| !rings.is_empty())
            .collect())
    }
}

fn decode_arcs(source_name: &str, root: &Value) -> Result<Vec<Ring>, LoadError> {
    let malformed = |reason: String| LoadError::Json {
        source_name: source_name.to_owned(),
        reason,
    };
    let transform = root
        .get("transform")
        .map(|value| TopologyTransform::deserialize(value))
        .transpose()
        .map_err(|e| malformed(format!("invalid transform: {e}")))?;
    let Some(arcs) = root.get("arcs").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    let mut decoded = Vec::with_capacity(arcs.len());
    for (index, arc) in arcs.iter().enumerate() {
        let positions = arc
            .as_array()
            .ok_or_else(|| malformed(format!("arc {index} must be an array of positions")))?;
        let mut points = Ring::with_capacity(positions.len());
        let (mut x, mut y) = (0.0, 0.0);
        for position in positions {
            let (px, py) = position_pair(position)
                .ok_or_else(|| malformed(format!("arc {index} has a malformed position")))?;
            points.push(match transform {
                Some(transform) => {
                    x += px;
                    y += py;
                    (
                        x * transform.scale[0] + transform.translate[0],
                        y * transform.scale[1] + transform.translate[1],
                    )
                }
                None => (px, py),
            });
        }
        decoded.push(points);
    }
    Ok(decoded)
}

fn position_pair(value: &Value) -> Option<(f64, f64)> {
    let pair = value.as_array()?;
    Some((pair.first()?.as_f64()?, pair.get(1)?.as_f64()?))
}

fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Parses a TopoJSON document and decodes the outlines of its `countries`
/// object, quantized or not.
pub fn parse_world_geometry(source_name: &str, text: &str) -> Result<WorldGeometry, LoadError> {
    let root: Value = serde_json::from_str(text).map_err(|e| LoadError::Json {
        source_name: source_name.to_owned(),
        reason: e.to_string(),
    })?;
    let missing = || LoadError::MissingObject {
        source_name: source_name.to_owned(),
        object: COUNTRIES_OBJECT.to_owned(),
    };
    let geometries = root
        .get("objects")
        .and_then(|objects| objects.get(COUNTRIES_OBJECT))
        .and_then(|countries| countries.get("geometries"))
        .and_then(Value::as_array)
        .ok_or_else(missing)?;

    let decoder = TopologyDecoder {
        source_name,
        arcs: decode_arcs(source_name, &root)?,
    };
    let countries = geometries
        .iter()
        .map(|geometry| {
            Ok(CountryShape {
                id: geometry.get("id").and_then(id_text),
                name: geometry
                    .get("properties")
                    .and_then(|properties| properties.get("name"))
                    .and_then(Value::as_str)
                    .map(str::to_owned),
                polygons: decoder.polygons(geometry)?,
            })
        })
        .collect::<Result<Vec<_>, LoadError>>()?;

    Ok(WorldGeometry { countries })
}

#[cfg(test)]
mod tests {
    use super::parse_world_geometry;
    use crate::error::LoadError;

    #[test]
    fn decodes_quantized_arcs_into_rings() {
        // Arc 0 runs (0,0) -> (10,0) -> (10,10); arc 1 closes back to (0,0).
        let text = r#"{
            "type": "Topology",
            "transform": {"scale": [0.5, 0.5], "translate": [30.0, 20.0]},
            "objects": {"countries": {"type": "GeometryCollection", "geometries": [
                {"type": "Polygon", "id": "760", "properties": {"name": "Syria"}, "arcs": [[0, 1]]},
                {"type": "MultiPolygon", "id": 368, "properties": {"name": "Iraq"}, "arcs": [[[-2, -1]]]},
                {"type": null, "id": "-99", "properties": {"name": "Nowhere"}}
            ]}},
            "arcs": [[[0, 0], [10, 0], [0, 10]], [[10, 10], [-10, -10]]]
        }"#;
        let world = parse_world_geometry("world.json", text).expect("topology");
        assert_eq!(world.countries.len(), 3);

        let syria = world.country("Syria").expect("syria");
        assert_eq!(
            syria.polygons,
            vec![vec![vec![(30.0, 20.0), (35.0, 20.0), (35.0, 25.0), (30.0, 20.0)]]]
        );

        let iraq = world.country("Iraq").expect("iraq");
        assert_eq!(iraq.id.as_deref(), Some("368"));
        assert_eq!(
            iraq.rings().next().expect("ring"),
            &vec![(30.0, 20.0), (35.0, 25.0), (35.0, 20.0), (30.0, 20.0)]
        );
        assert!(world.country("Nowhere").expect("nowhere").polygons.is_empty());
    }

    #[test]
    fn untransformed_arcs_are_absolute_and_short_rings_dropped() {
        let text = r#"{
            "objects": {"countries": {"geometries": [
                {"type": "Polygon", "properties": {"name": "Lebanon"}, "arcs": [[0], [1]]}
            ]}},
            "arcs": [[[35.1, 33.0], [36.6, 34.6], [35.9, 33.3], [35.1, 33.0]], [[1, 1], [2, 2]]]
        }"#;
        let world = parse_world_geometry("world.json", text).expect("topology");
        let lebanon = world.country("Lebanon").expect("lebanon");
        assert_eq!(lebanon.rings().count(), 1);
        assert_eq!(lebanon.rings().next().map(Vec::len), Some(4));
        assert_eq!(lebanon.label(), Some("Lebanon"));
    }

    #[test]
    fn missing_countries_object_is_a_load_error() {
        let error = parse_world_geometry("world.json", r#"{"objects": {"land": {}}}"#)
            .expect_err("no countries");
        assert!(matches!(error, LoadError::MissingObject { .. }));
        assert!(matches!(
            parse_world_geometry("world.json", "{not json"),
            Err(LoadError::Json { .. })
        ));
        let dangling = r#"{
            "objects": {"countries": {"geometries": [
                {"type": "Polygon", "properties": {"name": "Oman"}, "arcs": [[4]]}
            ]}},
            "arcs": []
        }"#;
        assert!(matches!(
            parse_world_geometry("world.json", dangling),
            Err(LoadError::Json { .. })
        ));
    }
}
