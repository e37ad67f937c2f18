use iced::widget::{Space, button, column, container, image, row, text};
use iced::{Alignment, Element, Length};

use super::CANVAS_BG;
use crate::app::{App, Message};

pub fn view(app: &App) -> Element<'_, Message> {
    let toolbar = row![
        text("Afterimage").size(24),
        Space::new().width(Length::Fill),
        button("Show Live").on_press(Message::ToggleDisplay),
    ]
    .spacing(10)
    .padding(10)
    .align_y(Alignment::Center);

    let canvas_style = |_theme: &_| container::Style {
        background: Some(CANVAS_BG.into()),
        ..Default::default()
    };

    // The composite only goes up once the trail holds its full thirty
    // frames; a half-filled trail reads as flicker, not as a light trail.
    let body = if app.trail_is_full()
        && let Some(handle) = app.composited()
    {
        container(
            image(handle.clone())
                .width(Length::Fill)
                .height(Length::Fill),
        )
        .style(canvas_style)
        .width(Length::Fill)
        .height(Length::Fill)
    } else {
        let progress = format!(
            "Collecting frames... {}/{}",
            app.trail_len(),
            app.trail_capacity()
        );
        container(text(progress).size(16))
            .style(canvas_style)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
    };

    let status = container(text(app.status_message()).size(12))
        .padding(5)
        .width(Length::Fill);

    column![toolbar, body, status]
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
