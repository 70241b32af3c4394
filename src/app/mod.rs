// SPDX-License-Identifier: MPL-2.0

//! Main application module
//!
//! - `state`: application state (`AppModel`, `Message`, `ContextPage`)
//! - `camera_preview`: preview surface and frame conversion
//! - `settings`: settings drawer
//! - `view`: main view
//! - `update`: message dispatch to `handlers`

mod camera_preview;
mod handlers;
mod settings;
mod state;
mod update;
mod view;

pub use camera_preview::{frame_to_handle, mirrored_rgba};
pub use state::{AppModel, ContextPage, Message};

use crate::backends::camera::types::LensFacing;
use crate::backends::camera::{CaptureController, choose_format};
use crate::config::{AppTheme, Config};
use crate::constants::{app_info, timing};
use crate::fl;
use crate::pipelines::photo::EncodingQuality;
use cosmic::app::context_drawer;
use cosmic::iced::Subscription;
use cosmic::widget::toaster::Toasts;
use cosmic::widget::{self, about::About};
use cosmic::{Element, Task};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tracing::{debug, error, info, warn};

impl cosmic::Application for AppModel {
    /// The async executor that will be used to run your application's commands.
    type Executor = cosmic::executor::Default;

    /// Data that your application receives to its init method.
    type Flags = ();

    /// Messages which the application and its widgets will emit.
    type Message = Message;

    /// Unique identifier in RDNN (reverse domain name notation) format.
    const APP_ID: &'static str = app_info::APP_ID;

    fn core(&self) -> &cosmic::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::Core {
        &mut self.core
    }

    fn init(
        core: cosmic::Core,
        _flags: Self::Flags,
    ) -> (Self, Task<cosmic::Action<Self::Message>>) {
        let about = About::default()
            .name(fl!("app-title"))
            .version(app_info::version())
            .links([(fl!("repository"), app_info::REPOSITORY)])
            .license(env!("CARGO_PKG_LICENSE"));

        let (config_handler, config) = crate::config::load();

        if let Err(e) = gstreamer::init() {
            error!(error = %e, "Failed to initialize GStreamer");
        }

        let theme_options = AppTheme::ALL
            .iter()
            .map(|theme| match theme {
                AppTheme::System => fl!("theme-system"),
                AppTheme::Dark => fl!("theme-dark"),
                AppTheme::Light => fl!("theme-light"),
            })
            .collect();
        let lens_options = LensFacing::ALL
            .iter()
            .map(|facing| match facing {
                LensFacing::Back => fl!("lens-back"),
                LensFacing::Front => fl!("lens-front"),
            })
            .collect();
        let quality_options = EncodingQuality::ALL
            .iter()
            .map(|quality| match quality {
                EncodingQuality::Low => fl!("quality-low"),
                EncodingQuality::Medium => fl!("quality-medium"),
                EncodingQuality::High => fl!("quality-high"),
                EncodingQuality::Maximum => fl!("quality-maximum"),
            })
            .collect();

        let app = AppModel {
            core,
            context_page: ContextPage::default(),
            about,
            controller: CaptureController::new(config.default_facing),
            config_handler,
            permission: None,
            cameras_enumerated: false,
            current_frame: None,
            preview_handle: None,
            is_capturing: false,
            toasts: Toasts::new(Message::CloseToast),
            theme_options,
            lens_options,
            quality_options,
            config,
        };

        let theme_task = cosmic::command::set_theme(app.config.app_theme.theme());

        (app, Task::batch([theme_task, Self::resolve_permission_task()]))
    }

    /// Elements to pack at the end of the header bar.
    fn header_end(&self) -> Vec<Element<'_, Self::Message>> {
        vec![
            widget::button::icon(widget::icon::from_name("preferences-system-symbolic"))
                .on_press(Message::ToggleContextPage(ContextPage::Settings))
                .into(),
        ]
    }

    /// Display a context drawer if the context page is requested.
    fn context_drawer(&self) -> Option<context_drawer::ContextDrawer<'_, Self::Message>> {
        if !self.core.window.show_context {
            return None;
        }

        Some(match self.context_page {
            ContextPage::About => context_drawer::about(
                &self.about,
                |url| Message::LaunchUrl(url.to_string()),
                Message::ToggleContextPage(ContextPage::About),
            ),
            ContextPage::Settings => self.settings_view(),
        })
    }

    fn view(&self) -> Element<'_, Self::Message> {
        self.view()
    }

    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        self.update(message)
    }

    /// Register subscriptions for this application.
    fn subscription(&self) -> Subscription<Self::Message> {
        let config_sub = self
            .core()
            .watch_config::<Config>(Self::APP_ID)
            .map(|update| Message::UpdateConfig(update.config));

        if !self.permission_granted() {
            return config_sub;
        }

        let mut subscriptions = vec![config_sub, self.hotplug_subscription()];
        if let Some(camera_sub) = self.camera_subscription() {
            subscriptions.push(camera_sub);
        }
        Subscription::batch(subscriptions)
    }
}

impl AppModel {
    /// Preview stream for the bound session
    ///
    /// Keyed by the session, so a lens change drops the old pipeline and
    /// starts a new one.
    fn camera_subscription(&self) -> Option<Subscription<Message>> {
        use cosmic::iced::futures::StreamExt;

        let cancel_flag = self.controller.cancel_flag()?;
        let key = self.controller.session_key()?;
        let device = self.controller.resolve_device()?.clone();

        Some(Subscription::run_with_id(
            ("camera", key),
            cosmic::iced::stream::channel(
                crate::constants::pipeline::FRAME_CHANNEL_CAPACITY,
                move |mut output| async move {
                    info!(name = %device.name, path = %device.path, "Camera subscription started");
                    let mut frame_count = 0u64;

                    while !cancel_flag.load(Ordering::Acquire) {
                        let target = device.clone();
                        let format = tokio::task::spawn_blocking(move || {
                            let backend = crate::backends::camera::get_backend();
                            choose_format(&backend.get_formats(&target))
                        })
                        .await
                        .ok();
                        if let Some(format) = &format {
                            info!(%format, "Using format");
                        }

                        let (sender, mut receiver) =
                            cosmic::iced::futures::channel::mpsc::channel(
                                crate::constants::pipeline::FRAME_CHANNEL_CAPACITY,
                            );
                        let backend = crate::backends::camera::get_backend();
                        let pipeline = match backend.start_preview(&device, format.as_ref(), sender)
                        {
                            Ok(pipeline) => pipeline,
                            Err(e) => {
                                error!(error = %e, "Failed to initialize pipeline");
                                tokio::time::sleep(Duration::from_secs(
                                    timing::PIPELINE_RETRY_SECS,
                                ))
                                .await;
                                continue;
                            }
                        };
                        debug!(pipeline = %pipeline.description(), "Preview running");

                        loop {
                            if cancel_flag.load(Ordering::Acquire) || output.is_closed() {
                                info!("Camera subscription cancelled");
                                break;
                            }

                            match tokio::time::timeout(
                                Duration::from_millis(timing::FRAME_POLL_MS),
                                receiver.next(),
                            )
                            .await
                            {
                                Ok(Some(frame)) => {
                                    frame_count += 1;
                                    if frame_count % timing::FRAME_LOG_INTERVAL == 0 {
                                        debug!(
                                            frame = frame_count,
                                            width = frame.width,
                                            height = frame.height,
                                            latency_ms =
                                                frame.captured_at.elapsed().as_secs_f64() * 1000.0,
                                            "Received frame from pipeline"
                                        );
                                    }

                                    // Only the latest frame matters; drop when the UI is behind
                                    if let Err(e) =
                                        output.try_send(Message::CameraFrame(Arc::new(frame)))
                                        && e.is_disconnected()
                                    {
                                        break;
                                    }
                                }
                                Ok(None) => {
                                    warn!("Preview frame stream ended");
                                    break;
                                }
                                Err(_) => {
                                    // No frame this tick; a dead pipeline keeps the channel open
                                    if let Some(reason) = pipeline.poll_failure() {
                                        warn!(%reason, "Preview pipeline stopped");
                                        break;
                                    }
                                }
                            }
                        }

                        drop(pipeline);
                        if output.is_closed() {
                            break;
                        }
                        if !cancel_flag.load(Ordering::Acquire) {
                            info!(
                                retry_secs = timing::PIPELINE_RETRY_SECS,
                                "Restarting preview pipeline"
                            );
                            tokio::time::sleep(Duration::from_secs(timing::PIPELINE_RETRY_SECS))
                                .await;
                        }
                    }

                    info!("Camera subscription stopped");
                },
            ),
        ))
    }

    /// Periodic re-enumeration to notice cameras coming and going
    fn hotplug_subscription(&self) -> Subscription<Message> {
        use cosmic::iced::futures::SinkExt;

        let known = self.controller.devices().to_vec();

        Subscription::run_with_id(
            "camera_hotplug",
            cosmic::iced::stream::channel(1, move |mut output| async move {
                info!("Camera hotplug monitoring started");
                let mut last_cameras = known;

                loop {
                    tokio::time::sleep(Duration::from_secs(timing::HOTPLUG_POLL_SECS)).await;

                    let Ok(cameras) = tokio::task::spawn_blocking(|| {
                        crate::backends::camera::get_backend().enumerate_cameras()
                    })
                    .await
                    else {
                        continue;
                    };

                    if cameras != last_cameras {
                        info!(
                            old_count = last_cameras.len(),
                            new_count = cameras.len(),
                            "Camera list changed - hotplug event detected"
                        );
                        last_cameras = cameras.clone();

                        if output
                            .send(Message::CameraListChanged(cameras))
                            .await
                            .is_err()
                        {
                            warn!("Failed to send camera list changed message - channel closed");
                            break;
                        }
                    }
                }
            }),
        )
    }
}
