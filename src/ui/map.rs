use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{MarkerShape, Plot, PlotBounds, Points};

use crate::render::map::MapView;
use crate::state::Session;

const MAP_HEIGHT: f32 = 450.0;

// ---------------------------------------------------------------------------
// Centers map (central panel)
// ---------------------------------------------------------------------------

/// Draw the map as a longitude/latitude scatter. Hovering a marker shows its
/// tooltip. `recenter` snaps the view to the map's center and zoom.
pub fn centers_map(ui: &mut Ui, session: &Session, view: &MapView, recenter: bool) {
    if let Some(notice) = view.notice {
        ui.label(RichText::new(notice).color(Color32::from_rgb(230, 170, 60)));
    }

    if let Some(cm) = &session.color_map {
        ui.horizontal_wrapped(|ui: &mut Ui| {
            for (label, color) in cm.legend_entries() {
                ui.label(RichText::new("●").color(color));
                ui.label(label);
                ui.add_space(8.0);
            }
        });
    }

    let (lat, lon) = view.center;
    let half = view.half_span_degrees();

    Plot::new("centers_map")
        .height(MAP_HEIGHT)
        .data_aspect(1.0)
        .x_axis_label("Longitud")
        .y_axis_label("Latitud")
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .label_formatter(|name, point| {
            if name.is_empty() {
                format!("{:.4}°, {:.4}°", point.y, point.x)
            } else {
                name.to_owned()
            }
        })
        .show(ui, |plot_ui| {
            if recenter {
                plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                    [lon - half, lat - half],
                    [lon + half, lat + half],
                ));
            }

            for marker in &view.markers {
                let color = session
                    .color_map
                    .as_ref()
                    .map(|cm| cm.color_for(&marker.category))
                    .unwrap_or(Color32::LIGHT_BLUE);

                plot_ui.points(
                    Points::new(vec![[marker.longitude, marker.latitude]])
                        .name(&marker.tooltip)
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(6.0)
                        .color(color),
                );
            }
        });
}
