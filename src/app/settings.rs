// SPDX-License-Identifier: MPL-2.0

//! Settings drawer view

use crate::app::state::{AppModel, ContextPage, Message};
use crate::backends::camera::types::LensFacing;
use crate::config::AppTheme;
use crate::constants::app_info;
use crate::fl;
use crate::pipelines::photo::EncodingQuality;
use cosmic::Element;
use cosmic::app::context_drawer;
use cosmic::iced::{Alignment, Length};
use cosmic::widget;

impl AppModel {
    /// Settings page of the context drawer
    pub fn settings_view(&self) -> context_drawer::ContextDrawer<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let theme_dropdown = widget::dropdown(
            &self.theme_options,
            AppTheme::ALL.iter().position(|t| *t == self.config.app_theme),
            Message::SetAppTheme,
        );

        let lens_dropdown = widget::dropdown(
            &self.lens_options,
            LensFacing::ALL
                .iter()
                .position(|f| *f == self.config.default_facing),
            Message::SetDefaultFacing,
        );

        let quality_dropdown = widget::dropdown(
            &self.quality_options,
            EncodingQuality::ALL
                .iter()
                .position(|q| *q == self.config.jpeg_quality),
            Message::SetJpegQuality,
        );

        let mirror_toggle = widget::toggler(self.config.mirror_front_camera)
            .on_toggle(Message::ToggleMirrorFrontCamera);

        let version_info = if app_info::is_flatpak() {
            format!("{} (Flatpak)", fl!("version", version = app_info::version()))
        } else {
            fl!("version", version = app_info::version())
        };

        let save_location = widget::row()
            .push(
                widget::text(self.photo_directory().display().to_string())
                    .size(12)
                    .width(Length::Fill),
            )
            .push(widget::button::standard(fl!("open-folder")).on_press(Message::OpenPhotoFolder))
            .align_y(Alignment::Center)
            .spacing(spacing.space_xs);

        let settings_column: Element<'_, Message> = widget::column()
            .push(section_title(fl!("settings-appearance")))
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(theme_dropdown)
            .push(widget::vertical_space().height(spacing.space_l))
            .push(widget::divider::horizontal::default())
            .push(widget::vertical_space().height(spacing.space_s))
            .push(section_title(fl!("settings-camera")))
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(widget::text(fl!("default-lens")).size(14))
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(lens_dropdown)
            .push(widget::vertical_space().height(spacing.space_s))
            .push(
                widget::row()
                    .push(widget::text(fl!("mirror-front-camera")).size(14))
                    .push(widget::horizontal_space().width(Length::Fill))
                    .push(mirror_toggle)
                    .align_y(Alignment::Center),
            )
            .push(widget::vertical_space().height(spacing.space_l))
            .push(widget::divider::horizontal::default())
            .push(widget::vertical_space().height(spacing.space_s))
            .push(section_title(fl!("settings-photo")))
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(widget::text(fl!("jpeg-quality")).size(14))
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(quality_dropdown)
            .push(widget::vertical_space().height(spacing.space_s))
            .push(widget::text(fl!("save-location")).size(14))
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(save_location)
            .push(widget::vertical_space().height(spacing.space_l))
            .push(widget::divider::horizontal::default())
            .push(widget::vertical_space().height(spacing.space_s))
            .push(
                widget::row()
                    .push(
                        widget::text(version_info)
                            .size(12)
                            .class(cosmic::theme::Text::Accent),
                    )
                    .push(widget::horizontal_space().width(Length::Fill))
                    .push(
                        widget::button::link(fl!("about"))
                            .on_press(Message::ToggleContextPage(ContextPage::About)),
                    )
                    .align_y(Alignment::Center),
            )
            .spacing(0)
            .into();

        context_drawer::context_drawer(
            settings_column,
            Message::ToggleContextPage(ContextPage::Settings),
        )
        .title(fl!("settings"))
    }
}

fn section_title<'a>(text: String) -> Element<'a, Message> {
    widget::text(text).size(16).font(cosmic::font::bold()).into()
}
