use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, DatePickerButton, TableBuilder};

use crate::data::loader::{COL_CATEGORY, COL_REGION};
use crate::state::{AppState, FilterColumn};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.table.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Date range ----
            if let Some((mut from, mut to)) = state.selection.dates {
                ui.strong("Order date");
                ui.horizontal(|ui: &mut Ui| {
                    ui.label("From");
                    ui.add(DatePickerButton::new(&mut from).id_salt("date_from"));
                });
                ui.horizontal(|ui: &mut Ui| {
                    ui.label("To");
                    ui.add(DatePickerButton::new(&mut to).id_salt("date_to"));
                });
                if state.selection.dates != Some((from, to)) {
                    state.set_date_range(from, to);
                }
                if from > to {
                    ui.label(RichText::new("Start date is after end date.").color(Color32::RED));
                }
                ui.separator();
            }

            // ---- Region / category checklists (collapsible) ----
            checklist(ui, state, FilterColumn::Region, COL_REGION);
            checklist(ui, state, FilterColumn::Category, COL_CATEGORY);

            ui.separator();
            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
        });
}

fn checklist(ui: &mut Ui, state: &mut AppState, column: FilterColumn, title: &str) {
    let (all_values, selected) = match column {
        FilterColumn::Region => (state.all_regions.clone(), state.selection.regions.clone()),
        FilterColumn::Category => (state.all_categories.clone(), state.selection.categories.clone()),
    };

    // Show count of selected / total in the header
    let header_text = format!("{title}  ({}/{})", selected.len(), all_values.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(column);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(column);
                }
            });

            for val in &all_values {
                let mut checked = selected.contains(val);
                if ui.checkbox(&mut checked, val.as_str()).changed() {
                    state.toggle_filter_value(column, val);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if state.config.data_path.is_some() && ui.button("Reload").clicked() {
                state.reload_fixed_path();
                ui.close_menu();
            }
            let can_export = state.table.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export summary…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            ui.label(format!(
                "{} rows loaded, {} visible",
                table.len(),
                state.result.total_orders
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Dataset preview
// ---------------------------------------------------------------------------

const PREVIEW_ROWS: usize = 5;

/// Collapsible table with the first few rows of the loaded dataset.
pub fn preview(ui: &mut Ui, state: &AppState) {
    let Some(table) = &state.table else {
        return;
    };

    egui::CollapsingHeader::new("Dataset preview")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .columns(Column::auto().resizable(true), 7)
                .header(20.0, |mut header| {
                    for name in [
                        "Order Date",
                        "Region",
                        "State",
                        "Category",
                        "Product Name",
                        "Sales",
                        "Profit",
                    ] {
                        header.col(|ui: &mut Ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|mut body| {
                    for row in table.rows().iter().take(PREVIEW_ROWS) {
                        body.row(18.0, |mut cells| {
                            let date = row.order_date.map(|d| d.to_string()).unwrap_or_default();
                            for text in [
                                date,
                                row.region.clone(),
                                row.state.clone(),
                                row.category.clone(),
                                row.product_name.clone(),
                                format!("{:.2}", row.sale_amount),
                                format!("{:.2}", row.profit),
                            ] {
                                cells.col(|ui: &mut Ui| {
                                    ui.label(text);
                                });
                            }
                        });
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sales data")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.load_upload(&path);
    }
}

fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export summary")
        .set_file_name("sales_summary.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_summary(&path) {
            log::error!("Failed to export summary: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
