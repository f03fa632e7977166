/// Widgets for the results area
///
/// - details.rs turns a record into the text lines of a card
/// - card.rs lays a display unit out as an iced element

pub mod card;
pub mod details;
