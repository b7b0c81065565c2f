use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::render::table::TableView;

/// Render the filtered centers, or the placeholder when there are none.
pub fn centers_table(ui: &mut Ui, view: &TableView) {
    if let Some(placeholder) = view.placeholder {
        ui.label(placeholder);
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .columns(Column::auto().at_least(60.0), view.columns.len())
        .header(20.0, |mut header| {
            for name in &view.columns {
                header.col(|ui: &mut Ui| {
                    ui.strong(*name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, view.rows.len(), |mut row| {
                let cells = &view.rows[row.index()];
                for cell in cells {
                    row.col(|ui: &mut Ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}
