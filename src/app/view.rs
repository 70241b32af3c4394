// SPDX-License-Identifier: GPL-3.0-only

//! Main application view
//!
//! One row: the preview (or the permission message) on the left, the
//! Reverse/Capture column on the right, with notifications on top.

use crate::app::camera_preview::placeholder;
use crate::app::state::{AppModel, Message};
use crate::backends::camera::types::LensFacing;
use crate::constants::ui;
use crate::fl;
use cosmic::Element;
use cosmic::iced::{Alignment, Length};
use cosmic::widget;

impl AppModel {
    pub fn view(&self) -> Element<'_, Message> {
        let preview = if self.permission_granted() {
            self.build_camera_preview()
        } else {
            placeholder(fl!("permission-not-granted"))
        };

        let content = widget::row()
            .push(
                widget::container(preview)
                    .width(Length::FillPortion(ui::PREVIEW_PORTION))
                    .height(Length::Fill),
            )
            .push(self.build_controls())
            .height(Length::Fill);

        widget::toaster(&self.toasts, content)
    }

    fn build_controls(&self) -> Element<'_, Message> {
        // The lens selector works before permission is answered
        let reverse_button = widget::button::standard(fl!("reverse"))
            .width(Length::Fill)
            .on_press(Message::ReverseCamera);

        let capture_button = widget::button::suggested(fl!("capture"))
            .width(Length::Fill)
            .on_press_maybe(self.can_capture().then_some(Message::Capture));

        let lens = match self.controller.facing() {
            LensFacing::Back => fl!("lens-back"),
            LensFacing::Front => fl!("lens-front"),
        };

        widget::column()
            .push(reverse_button)
            .push(capture_button)
            .push(
                widget::text(fl!("current-lens", lens = lens))
                    .size(ui::LENS_LABEL_TEXT_SIZE)
                    .class(cosmic::theme::Text::Accent),
            )
            .spacing(ui::CONTROLS_SPACING)
            .padding(ui::CONTROLS_PADDING)
            .align_x(Alignment::Center)
            .width(Length::FillPortion(ui::CONTROLS_PORTION))
            .height(Length::Fill)
            .into()
    }
}
