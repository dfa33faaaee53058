//! Coach chat affordance. Messages are only logged; there is no assistant
//! behind it yet.

use eframe::egui;

#[derive(Debug, Default)]
pub struct ChatState {
    pub active: bool,
    pub message: String,
    focus_requested: bool,
}

impl ChatState {
    /// Show the input and focus it on the next frame.
    pub fn open(&mut self) {
        self.active = true;
        self.focus_requested = true;
    }

    /// Hide the input and discard the draft.
    pub fn close(&mut self) {
        self.active = false;
        self.message.clear();
        self.focus_requested = false;
    }

    pub fn can_send(&self) -> bool {
        !self.message.trim().is_empty()
    }

    /// Hand off the draft and close the input. Returns what was sent.
    pub fn send(&mut self) -> Option<String> {
        if !self.can_send() {
            return None;
        }
        let message = std::mem::take(&mut self.message);
        log::info!("Sending message: {message}");
        self.close();
        Some(message)
    }

    fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }
}

/// Assistant menu shown in the toolbar.
pub fn assistant_menu(ui: &mut egui::Ui, chat: &mut ChatState) {
    ui.menu_button("\u{2728}", |ui| {
        if ui.button("\u{1F4AC} Chat").clicked() {
            chat.open();
            ui.close_menu();
        }
        ui.add_enabled(false, egui::Button::new("\u{1F3A4} Talk"));
    });
}

/// Bottom input bar. Only drawn while the chat is active.
pub fn chat_input(ui: &mut egui::Ui, chat: &mut ChatState) {
    ui.horizontal(|ui| {
        let field_width = (ui.available_width() - 80.0).max(80.0);
        let response = ui.add(
            egui::TextEdit::singleline(&mut chat.message)
                .hint_text("Ask your coach...")
                .desired_width(field_width),
        );
        if chat.take_focus_request() {
            response.request_focus();
        }
        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            chat.send();
            return;
        }
        if ui
            .add_enabled(chat.can_send(), egui::Button::new("\u{27A4}"))
            .clicked()
        {
            chat.send();
        }
        if ui.button("\u{2716}").clicked() {
            chat.close();
        }
    });
}
