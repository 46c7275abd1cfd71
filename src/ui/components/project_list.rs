//! Project list screen: creation form and one card per project

use super::{format_date, labeled};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{RichText, ScrollArea, WidgetType};

pub struct ProjectList<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> ProjectList<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        ui.heading("Projects");
        ui.add_space(self.theme.spacing_sm);

        self.show_form(ui);
        ui.add_space(self.theme.spacing);

        self.show_projects(ui);
    }

    fn show_form(&mut self, ui: &mut egui::Ui) {
        self.theme.card_frame().show(ui, |ui| {
            ui.label(RichText::new("New project").strong().color(self.theme.text_primary));

            let name = ui.add(
                egui::TextEdit::singleline(&mut self.state.new_project_name)
                    .hint_text("Name")
                    .desired_width(f32::INFINITY),
            );
            labeled(name.clone(), WidgetType::TextEdit, "Project name");

            let description = ui.add(
                egui::TextEdit::multiline(&mut self.state.new_project_description)
                    .hint_text("Description (optional)")
                    .desired_rows(2)
                    .desired_width(f32::INFINITY),
            );
            labeled(description, WidgetType::TextEdit, "Project description");

            let submit_on_enter =
                name.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            let create = ui.add_enabled(
                self.state.can_create_project(),
                egui::Button::new("Create project").rounding(self.theme.button_rounding),
            );
            if create.clicked() || submit_on_enter {
                self.state.create_project();
            }
        });
    }

    fn show_projects(&mut self, ui: &mut egui::Ui) {
        if self.state.projects.is_empty() {
            ui.label(
                RichText::new("No projects yet. Create one to start transcribing meetings.")
                    .italics()
                    .color(self.theme.text_muted),
            );
            return;
        }

        let mut open = None;
        let mut delete = None;

        ScrollArea::vertical()
            .id_salt("project_list")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for project in &self.state.projects {
                    self.theme.card_frame().show(ui, |ui| {
                        ui.set_min_width(ui.available_width());
                        ui.horizontal(|ui| {
                            ui.vertical(|ui| {
                                ui.label(
                                    RichText::new(&project.name)
                                        .strong()
                                        .size(16.0)
                                        .color(self.theme.text_primary),
                                );
                                if !project.description.is_empty() {
                                    ui.label(
                                        RichText::new(&project.description)
                                            .color(self.theme.text_secondary),
                                    );
                                }
                                ui.label(
                                    RichText::new(format_date(&project.created_at))
                                        .small()
                                        .color(self.theme.text_muted),
                                );
                            });

                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Center),
                                |ui| {
                                    let del = ui.button(
                                        RichText::new("Delete").color(self.theme.error),
                                    );
                                    if labeled(
                                        del,
                                        WidgetType::Button,
                                        &format!("Delete {}", project.name),
                                    )
                                    .clicked()
                                    {
                                        delete = Some(project.id.clone());
                                    }

                                    let opened = ui.button("Open");
                                    if labeled(
                                        opened,
                                        WidgetType::Button,
                                        &format!("Open {}", project.name),
                                    )
                                    .clicked()
                                    {
                                        open = Some(project.id.clone());
                                    }
                                },
                            );
                        });
                    });
                    ui.add_space(self.theme.spacing_sm);
                }
            });

        if let Some(id) = delete {
            self.state.request_delete(&id);
        }
        if let Some(id) = open {
            self.state.open_project(&id);
        }
    }
}
