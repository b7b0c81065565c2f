use crate::data::model::{CenterRecord, CenterTable};

/// Map center used when no centers pass the filter (Santiago de Compostela).
pub const FALLBACK_CENTER: (f64, f64) = (42.8782, -8.5448);
pub const DEFAULT_ZOOM: u8 = 8;

pub const NO_RESULTS_NOTICE: &str =
    "No hay centros que cumplan los criterios de filtro para mostrar en el mapa.";

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub latitude: f64,
    pub longitude: f64,
    /// Center type, used for marker colour.
    pub category: String,
    pub tooltip: String,
}

/// Everything the UI needs to draw the map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    /// `(latitude, longitude)`.
    pub center: (f64, f64),
    pub zoom: u8,
    pub markers: Vec<Marker>,
    /// Set when nothing matched.
    pub notice: Option<&'static str>,
}

impl MapView {
    /// Half the visible longitude span, in degrees, at the current zoom.
    pub fn half_span_degrees(&self) -> f64 {
        180.0 / f64::from(1u32 << self.zoom)
    }
}

pub fn tooltip(record: &CenterRecord) -> String {
    format!(
        "{}\nDistancia: {:.1} km\nTiempo: {:.0} min",
        record.name, record.distance_km, record.time_min
    )
}

/// Build the map for the rows at `indices`.
pub fn build_map_view(table: &CenterTable, indices: &[usize]) -> MapView {
    let rows: Vec<&CenterRecord> = indices.iter().filter_map(|&i| table.records.get(i)).collect();

    if rows.is_empty() {
        return MapView {
            center: FALLBACK_CENTER,
            zoom: DEFAULT_ZOOM,
            markers: Vec::new(),
            notice: Some(NO_RESULTS_NOTICE),
        };
    }

    let n = rows.len() as f64;
    let lat = rows.iter().map(|r| r.latitude).sum::<f64>() / n;
    let lon = rows.iter().map(|r| r.longitude).sum::<f64>() / n;

    MapView {
        center: (lat, lon),
        zoom: DEFAULT_ZOOM,
        markers: rows
            .iter()
            .map(|r| Marker {
                latitude: r.latitude,
                longitude: r.longitude,
                category: r.center_type.clone(),
                tooltip: tooltip(r),
            })
            .collect(),
        notice: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{ActiveFilter, filtered_indices};
    use crate::data::loader::SwapRule;
    use crate::data::sample::example_table;

    #[test]
    fn center_is_mean_of_surviving_rows() {
        let table = example_table(SwapRule::SignPattern).unwrap();
        let idx = filtered_indices(&table, &ActiveFilter::distance(1.5));
        let view = build_map_view(&table, &idx);

        // Centro A, B, E
        let lat = (42.8782 + 42.8790 + 42.8750) / 3.0;
        let lon = (-8.5448 + -8.5500 + -8.5400) / 3.0;
        assert!((view.center.0 - lat).abs() < 1e-9);
        assert!((view.center.1 - lon).abs() < 1e-9);
        assert_eq!(view.markers.len(), 3);
        assert_eq!(view.notice, None);
    }

    #[test]
    fn tooltip_rounds_distance_and_time() {
        let table = example_table(SwapRule::SignPattern).unwrap();
        let view = build_map_view(&table, &[0, 2]);
        assert_eq!(view.markers[0].tooltip, "Centro A\nDistancia: 0.5 km\nTiempo: 2 min");
        assert_eq!(view.markers[1].tooltip, "Centro C\nDistancia: 60.0 km\nTiempo: 45 min");
        assert_eq!(view.markers[1].category, "Colegio");
    }

    #[test]
    fn empty_selection_falls_back_to_santiago() {
        let table = example_table(SwapRule::SignPattern).unwrap();
        let view = build_map_view(&table, &[]);
        assert_eq!(view.center, FALLBACK_CENTER);
        assert!(view.markers.is_empty());
        assert_eq!(view.notice, Some(NO_RESULTS_NOTICE));
    }

    #[test]
    fn span_halves_per_zoom_level() {
        let table = example_table(SwapRule::SignPattern).unwrap();
        let mut view = build_map_view(&table, &[]);
        assert_eq!(view.half_span_degrees(), 0.703125);
        view.zoom = 9;
        assert_eq!(view.half_span_degrees(), 0.3515625);
    }
}
