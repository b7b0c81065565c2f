use eframe::egui::{self, ScrollArea, Ui};

use crate::assistant::gemini::GeminiExtractor;
use crate::assistant::{FilterExtractor, Unconfigured};
use crate::config::Config;
use crate::state::Session;
use crate::ui::{map, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CentrosApp {
    pub session: Session,
    extractor: Box<dyn FilterExtractor>,
    chat_input: String,
    /// Last session generation the map was centered for.
    map_generation: u64,
}

impl CentrosApp {
    pub fn new(config: &Config) -> Self {
        let extractor: Box<dyn FilterExtractor> =
            match GeminiExtractor::from_config(&config.assistant) {
                Some(client) => Box::new(client),
                None => {
                    log::warn!("GEMINI_API_KEY not set; chat filters are disabled");
                    Box::new(Unconfigured)
                }
            };

        let mut session = Session::new(config.data.swap_rule);
        match &config.data.startup_csv {
            Some(path) => session.on_file_opened(path),
            None => session.on_sample_requested(),
        }

        Self {
            session,
            extractor,
            chat_input: String::new(),
            map_generation: u64::MAX,
        }
    }
}

impl eframe::App for CentrosApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.session);
        });

        // ---- Left side panel: sliders + chat ----
        egui::SidePanel::left("filter_panel")
            .default_width(280.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(
                    ui,
                    &mut self.session,
                    self.extractor.as_ref(),
                    &mut self.chat_input,
                );
            });

        // ---- Central panel: count, map, table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui: &mut Ui| {
                ui.heading("Centros Educativos en Galicia");
                panels::status_messages(ui, &self.session);

                let (Some(map_view), Some(table_view)) =
                    (self.session.map_view(), self.session.table_view())
                else {
                    return;
                };

                ui.heading(format!("Centros encontrados: {}", self.session.result_count()));

                let recenter = self.map_generation != self.session.generation;
                self.map_generation = self.session.generation;
                map::centers_map(ui, &self.session, &map_view, recenter);

                ui.add_space(8.0);
                ui.heading("Detalles de los Centros Filtrados");
                table::centers_table(ui, &table_view);
            });
        });
    }
}
