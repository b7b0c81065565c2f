use eframe::egui::{self, Color32, Key, RichText, ScrollArea, Ui};

use crate::assistant::FilterExtractor;
use crate::state::{Role, Session, StatusLevel, Threshold};

// ---------------------------------------------------------------------------
// Left side panel – sliders and chat
// ---------------------------------------------------------------------------

/// Render the left panel: threshold sliders, then the filter chat.
pub fn side_panel(
    ui: &mut Ui,
    session: &mut Session,
    extractor: &dyn FilterExtractor,
    chat_input: &mut String,
) {
    ui.heading("Filtros");
    ui.separator();

    if session.table.is_none() {
        ui.label("No hay datos cargados.");
        return;
    }

    let max_distance = session.distance_slider_max();
    let mut distance = session.filter.max_distance_km.unwrap_or(max_distance);
    let label = format!("Distancia máxima a Santiago: {distance:.1} km");
    let response = ui.add(
        egui::Slider::new(&mut distance, 0.0..=max_distance)
            .clamping(egui::SliderClamping::Never)
            .step_by(0.1)
            .show_value(false)
            .text(label),
    );
    if moved_by_user(&response) {
        session.on_threshold_changed(Threshold::Distance, distance);
    }

    let max_time = session.time_slider_max();
    let mut time = session.filter.max_time_min.unwrap_or(max_time);
    let label = format!("Tiempo máximo a Santiago: {time:.0} min");
    let response = ui.add(
        egui::Slider::new(&mut time, 0.0..=max_time)
            .clamping(egui::SliderClamping::Never)
            .step_by(1.0)
            .show_value(false)
            .text(label),
    );
    if moved_by_user(&response) {
        session.on_threshold_changed(Threshold::Time, time);
    }

    if !session.filter.is_unconstrained() && ui.button("Quitar filtros").clicked() {
        session.on_filter_cleared();
    }

    ui.add_space(8.0);
    ui.heading("Chatbot de Filtros");
    ui.separator();

    ScrollArea::vertical()
        .max_height((ui.available_height() - 40.0).max(80.0))
        .auto_shrink([false, true])
        .show(ui, |ui: &mut Ui| {
            for message in &session.history {
                let (who, color) = match message.role {
                    Role::User => ("Tú", Color32::LIGHT_BLUE),
                    Role::Assistant => ("Asistente", Color32::LIGHT_GREEN),
                };
                ui.label(RichText::new(who).strong().color(color));
                // Chat replies use **bold** markers; egui labels are plain.
                ui.label(message.content.replace("**", ""));
                ui.add_space(4.0);
            }
        });

    ui.horizontal(|ui: &mut Ui| {
        let response = ui.add(
            egui::TextEdit::singleline(chat_input)
                .hint_text("Escribe tu filtro (ej. 'a 50 km')")
                .desired_width(ui.available_width() - 60.0),
        );
        let entered = response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
        if (ui.button("Enviar").clicked() || entered) && !chat_input.trim().is_empty() {
            let query = std::mem::take(chat_input);
            session.on_filter_submitted(query.trim(), extractor);
        }
    });
}

/// A slider counts as moved only while the pointer or keyboard is on it;
/// egui also reports `changed` when it snaps a shown value to the step grid.
fn moved_by_user(response: &egui::Response) -> bool {
    response.changed()
        && (response.dragged() || response.is_pointer_button_down_on() || response.has_focus())
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, session: &mut Session) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Archivo", |ui: &mut Ui| {
            if ui.button("Abrir CSV…").clicked() {
                open_file_dialog(session);
                ui.close_menu();
            }
            if ui.button("Datos de ejemplo").clicked() {
                session.on_sample_requested();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &session.table {
            ui.label(format!(
                "{} centros cargados, {} visibles",
                table.len(),
                session.result_count()
            ));
        }

        if let Some(msg) = session.last_error() {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Status messages
// ---------------------------------------------------------------------------

pub fn status_messages(ui: &mut Ui, session: &Session) {
    for status in &session.statuses {
        let color = match status.level {
            StatusLevel::Success => Color32::from_rgb(90, 180, 90),
            StatusLevel::Info => Color32::from_rgb(110, 160, 230),
            StatusLevel::Warning => Color32::from_rgb(230, 170, 60),
            StatusLevel::Error => Color32::RED,
        };
        ui.label(RichText::new(&status.text).color(color));
    }
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(session: &mut Session) {
    let file = rfd::FileDialog::new()
        .set_title("Sube tu archivo CSV de centros")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Opening {}", path.display());
        session.on_file_opened(&path);
    }
}
