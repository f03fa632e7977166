use iced::font::Weight;
use iced::widget::{column, container, image, row, text, Column};
use iced::{Element, Font, Length};

use super::details::FoodDetails;
use crate::state::session::{DisplayUnit, ImageState};
use crate::Message;

/// Side of the square picture area on each card
const IMAGE_SLOT: f32 = 128.0;

/// Card for one search result: picture slot on the left, details on the right
pub(crate) fn food_card(unit: &DisplayUnit) -> Element<'_, Message> {
    let details = FoodDetails::new(unit.record(), unit.barcode());

    let picture: Element<Message> = match unit.image() {
        ImageState::Pending => text("Loading image...").size(12).into(),
        ImageState::Resolved(product_image) => image(product_image.handle.clone())
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
        ImageState::Unavailable => text("No image available").size(12).into(),
    };

    let picture = container(picture)
        .width(IMAGE_SLOT)
        .height(IMAGE_SLOT)
        .center_x(IMAGE_SLOT)
        .center_y(IMAGE_SLOT);

    let bold = Font {
        weight: Weight::Bold,
        ..Font::DEFAULT
    };

    let info: Column<Message> = details.lines.into_iter().fold(
        column![text(details.name).size(18).font(bold)].spacing(2),
        |info, line| info.push(text(line).size(13)),
    );

    container(row![picture, info].spacing(16))
        .padding(12)
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
}
